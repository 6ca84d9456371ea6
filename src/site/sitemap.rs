use std::fmt::Write;

use chrono::NaiveDate;

use crate::catalog::{Catalog, pagination::page_path};
use crate::site::{SiteContext, content::BlogPost, html::escape};

/// Value of `<changefreq>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    /// Feed pages.
    Daily,
    /// Video and shop pages.
    Weekly,
    /// About page and posts.
    Monthly,
}

impl ChangeFrequency {
    /// Value as written in the XML.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// One `<url>` of the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Site-relative path.
    pub path: String,
    /// Written as `<lastmod>`.
    pub last_modified: NaiveDate,
    /// Written as `<changefreq>`.
    pub change_frequency: ChangeFrequency,
    /// Between 0.0 and 1.0.
    pub priority: f32,
}

impl SitemapEntry {
    fn new(path: impl Into<String>, last_modified: NaiveDate, change_frequency: ChangeFrequency, priority: f32) -> Self {
        SitemapEntry {
            path: path.into(),
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Every indexable page of the export. Legacy redirects are left out.
pub fn site_entries(
    catalog: &Catalog,
    total_pages: usize,
    posts: &[BlogPost],
    build_date: NaiveDate,
) -> Vec<SitemapEntry> {
    let mut entries = vec![
        SitemapEntry::new("/", build_date, ChangeFrequency::Daily, 1.0),
        SitemapEntry::new("/about/", build_date, ChangeFrequency::Monthly, 0.8),
        SitemapEntry::new("/shop/", build_date, ChangeFrequency::Weekly, 0.7),
        SitemapEntry::new("/tech/", build_date, ChangeFrequency::Weekly, 0.6),
    ];

    entries.extend(
        (1..total_pages).map(|index| SitemapEntry::new(page_path(index), build_date, ChangeFrequency::Daily, 0.5)),
    );
    entries.extend(
        posts
            .iter()
            .map(|post| SitemapEntry::new(post.path(), post.published_at, ChangeFrequency::Monthly, 0.5)),
    );
    entries.extend(
        catalog
            .releases()
            .iter()
            .map(|release| SitemapEntry::new(release.path(), release.published(), ChangeFrequency::Weekly, 0.6)),
    );
    entries
}

/// Renders `entries` as a sitemap with absolute URLs.
pub fn sitemap_xml(ctx: &SiteContext, entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        let _ = writeln!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>",
            escape(&ctx.absolute_url(&entry.path)),
            entry.last_modified.format("%Y-%m-%d"),
            entry.change_frequency.as_str(),
            entry.priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Allows everything and points crawlers at the sitemap.
pub fn robots_txt(ctx: &SiteContext) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        ctx.absolute_url("/sitemap.xml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        ReleaseDay,
        entities::tests::{item, ymd},
    };
    use crate::site::content;

    #[test]
    fn test_site_entries() {
        let catalog = Catalog::new(vec![ReleaseDay {
            date: ymd(2024, 1, 14),
            items: vec![item("Dave", "Streatham", "https://youtu.be/abc123")],
        }]);
        let posts = content::tech_posts();
        let entries = site_entries(&catalog, 3, &posts, ymd(2024, 6, 1));

        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(&paths[..6], &["/", "/about/", "/shop/", "/tech/", "/page/2/", "/page/3/"]);
        assert_eq!(paths.last(), Some(&"/video/dave-streatham-abc123/"));
        assert_eq!(entries.len(), 4 + 2 + posts.len() + 1);

        let video = entries.last().unwrap();
        assert_eq!(video.last_modified, ymd(2024, 1, 14));
        assert_eq!(video.change_frequency, ChangeFrequency::Weekly);
    }

    #[test]
    fn test_sitemap_xml_escapes_locations() {
        let ctx = SiteContext::new("https://ifuno.uk", "IFUNO").unwrap();
        let entries = vec![SitemapEntry::new("/video/a&b/", ymd(2024, 1, 14), ChangeFrequency::Weekly, 0.6)];
        let xml = sitemap_xml(&ctx, &entries);
        assert!(xml.contains("<loc>https://ifuno.uk/video/a&amp;b/</loc>"));
        assert!(xml.contains("<lastmod>2024-01-14</lastmod>"));
        assert!(xml.contains("<priority>0.6</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_robots_txt() {
        let ctx = SiteContext::new("https://ifuno.uk", "IFUNO").unwrap();
        assert!(robots_txt(&ctx).contains("Sitemap: https://ifuno.uk/sitemap.xml"));
    }
}
