//! Serves an already exported site, configured through the environment only.
use std::path::PathBuf;

use log::info;
use wtm::catalog::env_value;
use wtm::generator::DEFAULT_OUT_DIR;
use wtm::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let out_dir = env_value("WTM_OUT_DIR").map_or_else(|| PathBuf::from(DEFAULT_OUT_DIR), PathBuf::from);
    let addr = server::address_from_env()?;
    info!("Starting preview server ...");
    server::serve(out_dir, addr).await?;

    Ok(())
}
