use url::Url;

use crate::catalog::errors::{Error, Result};

/// Static text for the About, Shop and Tech pages
pub mod content;
/// Escaping, templating and the shared page layout
pub mod html;
/// Page bodies for every kind of output page
pub mod pages;
/// Titles, descriptions and JSON-LD structured data
pub mod seo;
/// `sitemap.xml` and `robots.txt`
pub mod sitemap;

/// Stylesheet shipped with every export.
pub const SITE_CSS: &str = include_str!("assets/site.css");
/// Modal player script shipped with every export.
pub const PLAYER_JS: &str = include_str!("assets/player.js");

/// Base URL used without `WTM_SITE_URL`.
pub const DEFAULT_SITE_URL: &str = "https://ifuno.uk";
/// Site name used without `WTM_SITE_NAME`.
pub const DEFAULT_SITE_NAME: &str = "IFUNO";

/// Site-wide settings every renderer needs.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Public root of the site, used for canonical and sitemap URLs.
    pub base_url: Url,
    /// Name shown in titles and the header.
    pub name: String,
}

impl SiteContext {
    /// Fails unless `base_url` is an http(s) URL.
    pub fn new(base_url: &str, name: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::ConfigurationError(format!(
                "site URL must be http or https, got {base_url}"
            )));
        }
        Ok(SiteContext {
            base_url,
            name: name.into(),
        })
    }

    /// Joins a site-relative path onto the base URL, keeping any path prefix
    /// the base URL has.
    pub fn absolute_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let ctx = SiteContext::new("https://ifuno.uk", "IFUNO").unwrap();
        assert_eq!(ctx.absolute_url("/"), "https://ifuno.uk/");
        assert_eq!(ctx.absolute_url("/about/"), "https://ifuno.uk/about/");

        let nested = SiteContext::new("https://example.com/music/", "IFUNO").unwrap();
        assert_eq!(
            nested.absolute_url("/video/a-b/"),
            "https://example.com/music/video/a-b/"
        );
        assert_eq!(nested.absolute_url("sitemap.xml"), "https://example.com/music/sitemap.xml");
    }

    #[test]
    fn test_rejects_bad_site_urls() {
        assert!(matches!(
            SiteContext::new("not a url", "IFUNO"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            SiteContext::new("ftp://ifuno.uk", "IFUNO"),
            Err(Error::ConfigurationError(_))
        ));
    }
}
