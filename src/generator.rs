use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use futures::stream::{StreamExt, iter};
use log::{debug, info, warn};

use crate::catalog::{
    Catalog, DataFile, Paginator, env_value,
    errors::{Error, Result},
    pagination::page_path,
};
use crate::site::{self, SiteContext, content, pages, sitemap};

/// Output directory used when neither a flag nor `WTM_OUT_DIR` is given.
pub const DEFAULT_OUT_DIR: &str = "out";
const DEFAULT_RELATED_COUNT: usize = 6;
const DEFAULT_CONCURRENCY: usize = 10;

/// Resolved settings for one export. Built with [`ConfigBuilder`].
pub struct Config {
    /// Where releases are read from.
    pub data: DataFile,
    /// Where the site is written.
    pub out_dir: PathBuf,
    /// Base URL and site name.
    pub site: SiteContext,
    /// Home feed page size.
    pub paginator: Paginator,
    /// Releases listed under "More UK Music Releases".
    pub related_count: usize,
    /// Files written at the same time.
    pub concurrency: usize,
    /// Write redirect pages at legacy `artist-title-year` URLs.
    pub legacy_redirects: bool,
    /// Remove the output directory before writing.
    pub clean: bool,
}

/// Collects [`Config`] overrides. Unset fields come from the environment.
#[derive(Default)]
pub struct ConfigBuilder {
    data_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    site_url: Option<String>,
    site_name: Option<String>,
    page_size: Option<usize>,
    related_count: Option<usize>,
    concurrency: Option<usize>,
    legacy_redirects: Option<bool>,
    clean: bool,
}

fn env_parsed<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_value(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::ConfigurationError(format!("{name} has an invalid value: {value:?}"))),
        None => Ok(None),
    }
}

impl ConfigBuilder {
    /// A builder with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides `WTM_DATA_PATH`.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Overrides `WTM_OUT_DIR`.
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Overrides `WTM_SITE_URL`.
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Overrides `WTM_SITE_NAME`.
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Overrides `WTM_PAGE_SIZE`.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Overrides `WTM_RELATED_COUNT`.
    pub fn related_count(mut self, count: usize) -> Self {
        self.related_count = Some(count);
        self
    }

    /// Overrides `WTM_CONCURRENCY`.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Overrides `WTM_LEGACY_REDIRECTS`.
    pub fn legacy_redirects(mut self, enabled: bool) -> Self {
        self.legacy_redirects = Some(enabled);
        self
    }

    /// Remove the output directory before writing.
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Fills every unset field from `WTM_*` environment variables, then from
    /// defaults.
    pub fn build(self) -> Result<Config> {
        let data = match self.data_path {
            Some(path) => DataFile::new(path),
            None => DataFile::try_default(),
        };
        let out_dir = self
            .out_dir
            .or_else(|| env_value("WTM_OUT_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
        let site_url = self
            .site_url
            .or_else(|| env_value("WTM_SITE_URL"))
            .unwrap_or_else(|| site::DEFAULT_SITE_URL.to_string());
        let site_name = self
            .site_name
            .or_else(|| env_value("WTM_SITE_NAME"))
            .unwrap_or_else(|| site::DEFAULT_SITE_NAME.to_string());

        let page_size = match self.page_size {
            Some(size) => Some(size),
            None => env_parsed("WTM_PAGE_SIZE")?,
        };
        let paginator = match page_size {
            Some(size) => Paginator::new(size)?,
            None => Paginator::default(),
        };
        let related_count = match self.related_count {
            Some(count) => count,
            None => env_parsed("WTM_RELATED_COUNT")?.unwrap_or(DEFAULT_RELATED_COUNT),
        };
        let concurrency = match self.concurrency {
            Some(n) => n,
            None => env_parsed("WTM_CONCURRENCY")?.unwrap_or(DEFAULT_CONCURRENCY),
        };
        if concurrency == 0 {
            return Err(Error::ConfigurationError(
                "write concurrency must be greater than zero".into(),
            ));
        }
        let legacy_redirects = match self.legacy_redirects {
            Some(enabled) => enabled,
            None => env_parsed("WTM_LEGACY_REDIRECTS")?.unwrap_or(true),
        };

        Ok(Config {
            data,
            out_dir,
            site: SiteContext::new(&site_url, site_name)?,
            paginator,
            related_count,
            concurrency,
            legacy_redirects,
            clean: self.clean,
        })
    }
}

/// One file of the export, relative to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// Rendered file contents.
    pub contents: String,
}

impl OutputFile {
    fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        OutputFile {
            path: path.into(),
            contents,
        }
    }

    // "/video/x/" -> "video/x/index.html"
    fn page(site_path: &str, contents: String) -> Self {
        let mut path = PathBuf::new();
        for segment in site_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push("index.html");
        OutputFile { path, contents }
    }
}

/// What an export produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Video pages written.
    pub releases: usize,
    /// Home feed pages, at least one.
    pub feed_pages: usize,
    /// Redirect pages written.
    pub legacy_redirects: usize,
    /// Includes the copied data file.
    pub files_written: usize,
}

/// Canonical slug of every video page, in feed order.
pub fn static_params(catalog: &Catalog) -> Vec<String> {
    catalog
        .releases()
        .iter()
        .map(|release| release.slug.clone())
        .collect()
}

/// Renders every file of the export without touching the disk.
pub fn plan_site(catalog: &Catalog, config: &Config, build_date: NaiveDate) -> Vec<OutputFile> {
    let ctx = &config.site;
    let releases = catalog.releases();
    let mut files = Vec::new();

    let mut index = 0;
    while let Some(view) = config.paginator.view(releases, index) {
        files.push(OutputFile::page(
            &page_path(index),
            pages::home_page(ctx, &view),
        ));
        index += 1;
    }
    let feed_pages = index;

    for release in releases {
        let related = catalog.related(release, config.related_count);
        files.push(OutputFile::page(
            &release.path(),
            pages::video_page(ctx, release, &related),
        ));
    }

    if config.legacy_redirects {
        for (legacy_slug, release) in catalog.legacy_aliases() {
            debug!("Redirecting legacy slug {legacy_slug} to {}", release.slug);
            files.push(OutputFile::page(
                &format!("/video/{legacy_slug}/"),
                pages::legacy_redirect_page(ctx, release),
            ));
        }
    }

    let posts = content::tech_posts();
    files.push(OutputFile::page("/about/", pages::about_page(ctx)));
    files.push(OutputFile::page("/shop/", pages::shop_page(ctx)));
    files.push(OutputFile::page("/tech/", pages::tech_index_page(ctx, &posts)));
    for post in &posts {
        files.push(OutputFile::page(&post.path(), pages::tech_post_page(ctx, post)));
    }
    files.push(OutputFile::new("404.html", pages::not_found_page(ctx)));

    let entries = sitemap::site_entries(catalog, feed_pages, &posts, build_date);
    files.push(OutputFile::new("sitemap.xml", sitemap::sitemap_xml(ctx, &entries)));
    files.push(OutputFile::new("robots.txt", sitemap::robots_txt(ctx)));
    files.push(OutputFile::new("assets/site.css", site::SITE_CSS.to_string()));
    files.push(OutputFile::new("assets/player.js", site::PLAYER_JS.to_string()));

    files
}

async fn write_file(out_dir: &Path, file: OutputFile) -> Result<PathBuf> {
    let target = out_dir.join(&file.path);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, file.contents).await?;
    Ok(file.path)
}

// Whether `path` is `dir` itself or lies below it. Only existing paths can match.
async fn is_inside(path: &Path, dir: &Path) -> Result<bool> {
    if !tokio::fs::try_exists(path).await? || !tokio::fs::try_exists(dir).await? {
        return Ok(false);
    }
    let path = tokio::fs::canonicalize(path).await?;
    let dir = tokio::fs::canonicalize(dir).await?;
    Ok(path.starts_with(dir))
}

/// Exports a site from a [`Config`].
pub struct Generator {
    config: Config,
}

impl Generator {
    /// A generator for `config`.
    pub fn new(config: Config) -> Self {
        Generator { config }
    }

    /// Settings the generator was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads the data file and writes the whole site, dated today.
    pub async fn build(&self) -> Result<BuildReport> {
        let build_date = chrono::Local::now().date_naive();
        self.build_on(build_date).await
    }

    /// Same as [`Generator::build`] with a fixed build date, which only
    /// shows up in the sitemap.
    pub async fn build_on(&self, build_date: NaiveDate) -> Result<BuildReport> {
        let out_dir = &self.config.out_dir;
        if self.config.clean && is_inside(self.config.data.path(), out_dir).await? {
            return Err(Error::ConfigurationError(format!(
                "{} is inside {}, which --clean would remove",
                self.config.data.path().display(),
                out_dir.display()
            )));
        }

        info!("Loading music data from {} ...", self.config.data.path().display());
        let catalog = self.config.data.read_catalog().await?;
        info!("{} releases loaded", catalog.len());

        if self.config.clean && tokio::fs::try_exists(out_dir).await? {
            info!("Removing previous export in {} ...", out_dir.display());
            tokio::fs::remove_dir_all(out_dir).await?;
        }
        tokio::fs::create_dir_all(out_dir).await?;

        let files = plan_site(&catalog, &self.config, build_date);
        let planned = files.len();
        debug!("Writing {planned} files to {} ...", out_dir.display());

        let concurrency = self.config.concurrency;
        let write_results = iter(files)
            .map(|file| write_file(out_dir, file))
            .buffer_unordered(concurrency)
            .collect::<Vec<Result<PathBuf>>>()
            .await;

        let mut failed = 0;
        let mut files_written = 0;
        for result in write_results {
            match result {
                Ok(path) => {
                    debug!("Wrote {}", path.display());
                    files_written += 1;
                }
                Err(e) => {
                    warn!("Error writing file: {e:?}");
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(Error::BuildError(format!(
                "{failed} of {planned} files could not be written"
            )));
        }

        // shipped as the site's raw data asset
        let data_target = out_dir.join("data.json");
        if self.config.data.exists().await? {
            if is_inside(self.config.data.path(), &data_target).await? {
                debug!("{} is already in place", data_target.display());
            } else {
                tokio::fs::copy(self.config.data.path(), &data_target).await?;
                files_written += 1;
            }
        }

        let total_pages = self.config.paginator.total_pages(catalog.len()).max(1);
        let report = BuildReport {
            releases: catalog.len(),
            feed_pages: total_pages,
            legacy_redirects: if self.config.legacy_redirects {
                catalog.legacy_aliases().len()
            } else {
                0
            },
            files_written,
        };
        info!(
            "Export completed successfully. {} releases, {} feed pages, {} files in {}",
            report.releases,
            report.feed_pages,
            report.files_written,
            out_dir.display()
        );
        Ok(report)
    }
}
