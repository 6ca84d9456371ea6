//! End-to-end export of a small data file into a temporary directory.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use wtm::catalog::errors::Error;
use wtm::generator::{ConfigBuilder, Generator};

const DATA: &str = r#"{
    "2024-01-12": [
        {"type": "spotify_topic", "artist": "Little Simz", "title": "Gorilla",
         "thumbnail_url": "https://img.example/simz.jpg",
         "embed_url": "https://open.spotify.com/embed/track/4x1"}
    ],
    "2024-01-14": [
        {"type": "youtube_video", "artist": "Dave", "title": "- Streatham",
         "thumbnail_url": "https://img.example/dave.jpg",
         "embed_url": "https://www.youtube.com/embed/abc123",
         "view_count": "1,204,331", "published_at": "2024-01-14T17:00:00Z"},
        {"type": "youtube_video", "artist": "Central Cee", "title": "Band4Band",
         "thumbnail_url": "https://img.example/cench.jpg",
         "embed_url": "https://www.youtube.com/embed/xyz789"}
    ]
}"#;

fn build_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn generator(data: &Path, out: &Path, page_size: usize) -> Generator {
    let config = ConfigBuilder::new()
        .data_path(data)
        .out_dir(out)
        .site_url("https://ifuno.uk")
        .site_name("IFUNO")
        .page_size(page_size)
        .related_count(6)
        .concurrency(4)
        .legacy_redirects(true)
        .build()
        .expect("Should build config");
    Generator::new(config)
}

fn read(out: &Path, relative: &str) -> String {
    fs::read_to_string(out.join(relative))
        .unwrap_or_else(|e| panic!("Should read {relative}: {e}"))
}

#[tokio::test]
async fn test_export_writes_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let out = dir.path().join("out");
    fs::write(&data, DATA).unwrap();

    let report = generator(&data, &out, 2).build_on(build_date()).await.unwrap();
    assert_eq!(report.releases, 3);
    assert_eq!(report.feed_pages, 2);
    assert_eq!(report.legacy_redirects, 3);

    let home = read(&out, "index.html");
    assert!(home.contains("3 releases"));
    assert!(home.contains("Sunday, January 14, 2024"));
    assert!(home.contains("Page 1 of 2"));
    assert!(!home.contains("Little Simz"));

    let second = read(&out, "page/2/index.html");
    assert!(second.contains("Friday, January 12, 2024"));
    assert!(second.contains("Little Simz"));

    let video = read(&out, "video/dave-streatham-abc123/index.html");
    assert!(video.contains("Dave - Streatham [2024]"));
    assert!(video.contains("\"userInteractionCount\":1204331"));

    assert!(out.join("video/little-simz-gorilla-track-4x1/index.html").exists());
    let redirect = read(&out, "video/dave-streatham-2024/index.html");
    assert!(redirect.contains("url=/video/dave-streatham-abc123/"));

    for page in ["about/index.html", "shop/index.html", "tech/index.html", "404.html"] {
        assert!(out.join(page).exists(), "missing {page}");
    }
    assert_eq!(read(&out, "data.json"), DATA);
    assert!(read(&out, "assets/player.js").contains("showModal"));

    let sitemap = read(&out, "sitemap.xml");
    assert!(sitemap.contains("<loc>https://ifuno.uk/video/central-cee-band4band-xyz789/</loc>"));
    assert!(sitemap.contains("<loc>https://ifuno.uk/page/2/</loc>"));
    assert!(!sitemap.contains("dave-streatham-2024"));
    assert!(read(&out, "robots.txt").contains("Sitemap: https://ifuno.uk/sitemap.xml"));
}

#[tokio::test]
async fn test_missing_data_file_exports_empty_site() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let report = generator(&dir.path().join("missing.json"), &out, 32)
        .build_on(build_date())
        .await
        .unwrap();
    assert_eq!(report.releases, 0);
    assert_eq!(report.feed_pages, 1);

    assert!(read(&out, "index.html").contains("No music releases found."));
    assert!(!out.join("video").exists());
    assert!(!out.join("data.json").exists());
}

#[tokio::test]
async fn test_malformed_data_fails_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    fs::write(&data, r#"{"not-a-date": []}"#).unwrap();

    let result = generator(&data, &dir.path().join("out"), 32)
        .build_on(build_date())
        .await;
    assert!(matches!(result, Err(Error::InvalidDate { .. })));
}

#[tokio::test]
async fn test_clean_removes_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let out = dir.path().join("out");
    fs::write(&data, DATA).unwrap();
    fs::create_dir_all(out.join("video/stale")).unwrap();
    fs::write(out.join("video/stale/index.html"), "old").unwrap();

    let config = ConfigBuilder::new()
        .data_path(&data)
        .out_dir(&out)
        .site_url("https://ifuno.uk")
        .clean(true)
        .build()
        .unwrap();
    Generator::new(config).build_on(build_date()).await.unwrap();

    assert!(!out.join("video/stale").exists());
    assert!(out.join("index.html").exists());
}

#[tokio::test]
async fn test_data_file_inside_output_is_left_intact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let data = out.join("data.json");
    fs::write(&data, DATA).unwrap();

    let report = generator(&data, &out, 32).build_on(build_date()).await.unwrap();
    assert_eq!(report.releases, 3);
    assert_eq!(read(&out, "data.json"), DATA);
    assert!(out.join("index.html").exists());
}

#[tokio::test]
async fn test_clean_refuses_to_remove_its_own_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let data = out.join("data.json");
    fs::write(&data, DATA).unwrap();

    let config = ConfigBuilder::new()
        .data_path(&data)
        .out_dir(&out)
        .site_url("https://ifuno.uk")
        .clean(true)
        .build()
        .unwrap();
    let result = Generator::new(config).build_on(build_date()).await;

    assert!(matches!(result, Err(Error::ConfigurationError(_))));
    assert_eq!(read(&out, "data.json"), DATA);
}
