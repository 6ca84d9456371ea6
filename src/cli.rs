use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use wtm::catalog::{DataFile, errors::Result};
use wtm::generator::{self, ConfigBuilder, Generator};
use wtm::server;

#[derive(Parser)]
#[command(name = "wtm")]
#[command(version, about = "Generate the static music video site from data.json", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the whole site
    Build {
        /// Music data file [env: WTM_DATA_PATH]
        #[arg(long)]
        data: Option<PathBuf>,
        /// Output directory [env: WTM_OUT_DIR]
        #[arg(long)]
        out: Option<PathBuf>,
        /// Public base URL used for canonical links and the sitemap [env: WTM_SITE_URL]
        #[arg(long)]
        site_url: Option<String>,
        /// Releases per feed page [env: WTM_PAGE_SIZE]
        #[arg(long)]
        page_size: Option<usize>,
        /// Skip redirect pages for old artist-title-year URLs
        #[arg(long)]
        no_legacy_redirects: bool,
        /// Remove the output directory first
        #[arg(long)]
        clean: bool,
    },
    /// Serve an exported site locally
    Serve {
        /// Directory to serve [env: WTM_OUT_DIR]
        #[arg(long)]
        out: Option<PathBuf>,
        /// Listen address [env: WTM_ADDR]
        #[arg(long)]
        addr: Option<String>,
        /// Export the site before serving
        #[arg(long)]
        build: bool,
    },
    /// Print the slug of every video page
    Slugs {
        /// Music data file [env: WTM_DATA_PATH]
        #[arg(long)]
        data: Option<PathBuf>,
        /// Also print legacy slugs and where they redirect
        #[arg(long)]
        legacy: bool,
    },
    /// Validate the data file without writing anything
    Check {
        /// Music data file [env: WTM_DATA_PATH]
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

/// Parses the command line and runs the chosen subcommand.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            data,
            out,
            site_url,
            page_size,
            no_legacy_redirects,
            clean,
        } => {
            let mut builder = ConfigBuilder::new().clean(clean);
            if let Some(data) = data {
                builder = builder.data_path(data);
            }
            if let Some(out) = out {
                builder = builder.out_dir(out);
            }
            if let Some(site_url) = site_url {
                builder = builder.site_url(site_url);
            }
            if let Some(page_size) = page_size {
                builder = builder.page_size(page_size);
            }
            if no_legacy_redirects {
                builder = builder.legacy_redirects(false);
            }
            build_site(builder).await?;
        }
        Commands::Serve { out, addr, build } => {
            let mut builder = ConfigBuilder::new();
            if let Some(out) = out {
                builder = builder.out_dir(out);
            }
            let addr = match addr {
                Some(raw) => server::parse_address(&raw)?,
                None => server::address_from_env()?,
            };
            let config = builder.build()?;
            let out_dir = config.out_dir.clone();
            if build {
                Generator::new(config).build().await?;
            }
            server::serve(out_dir, addr).await?;
        }
        Commands::Slugs { data, legacy } => {
            let catalog = data_file(data).read_catalog().await?;
            for slug in generator::static_params(&catalog) {
                println!("{slug}");
            }
            if legacy {
                for (legacy_slug, release) in catalog.legacy_aliases() {
                    println!("{legacy_slug} -> {}", release.slug);
                }
            }
        }
        Commands::Check { data } => {
            let data_file = data_file(data);
            if !data_file.exists().await? {
                info!("{} does not exist, the site would be empty", data_file.path().display());
                return Ok(());
            }
            let catalog = data_file.read_catalog().await?;
            let suffixed = catalog
                .releases()
                .iter()
                .filter(|release| release.slug != wtm::catalog::slug::slug_for_item(&release.item))
                .count();
            info!(
                "{} is valid: {} releases, {} with suffixed slugs, {} legacy redirects",
                data_file.path().display(),
                catalog.len(),
                suffixed,
                catalog.legacy_aliases().len()
            );
        }
    }
    Ok(())
}

fn data_file(path: Option<PathBuf>) -> DataFile {
    match path {
        Some(path) => DataFile::new(path),
        None => DataFile::try_default(),
    }
}

async fn build_site(builder: ConfigBuilder) -> Result<()> {
    info!("Building config ...");
    let config = builder.build()?;
    let generator = Generator::new(config);
    let report = generator.build().await?;
    info!(
        "{} video pages and {} legacy redirects generated",
        report.releases, report.legacy_redirects
    );
    Ok(())
}
