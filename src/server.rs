use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{Json, Router, routing::get};
use log::info;
use serde::Serialize;
use tower_http::services::{ServeDir, ServeFile};

use crate::catalog::{
    env_value,
    errors::{Error, Result},
};

/// Preview address used without `--addr` or `WTM_ADDR`.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Serves an exported site: directories resolve to their `index.html`,
/// anything missing gets `404.html` with a 404 status.
pub fn build_router(out_dir: &Path) -> Router {
    let not_found = ServeFile::new(out_dir.join("404.html"));
    let files = ServeDir::new(out_dir).not_found_service(not_found);

    Router::new()
        .route("/healthz", get(health))
        .fallback_service(files)
}

/// Preview address from `WTM_ADDR`, or the local default.
pub fn address_from_env() -> Result<SocketAddr> {
    let raw = env_value("WTM_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
    parse_address(&raw)
}

/// Parses an `ip:port` listen address.
pub fn parse_address(raw: &str) -> Result<SocketAddr> {
    raw.parse()
        .map_err(|e| Error::ConfigurationError(format!("invalid listen address {raw:?}: {e}")))
}

/// Serves `out_dir` on `addr` until the process is stopped.
pub async fn serve(out_dir: PathBuf, addr: SocketAddr) -> Result<()> {
    if !tokio::fs::try_exists(out_dir.join("index.html")).await? {
        return Err(Error::ConfigurationError(format!(
            "{} does not contain an exported site, run `wtm build` first",
            out_dir.display()
        )));
    }

    let app = build_router(&out_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Serving {} on http://{}",
        out_dir.display(),
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("127.0.0.1:3000").unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            parse_address("localhost"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn test_serve_refuses_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = serve(dir.path().to_path_buf(), "127.0.0.1:0".parse().unwrap()).await;
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
