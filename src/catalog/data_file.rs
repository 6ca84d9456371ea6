use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;

use crate::catalog::{
    dates, env_value, non_blank,
    entities::{Catalog, ItemKind, MusicItem, ReleaseDay},
    errors::Result,
};

/// Data file used when neither a path nor `WTM_DATA_PATH` is given.
pub const DEFAULT_DATA_PATH: &str = "public/data.json";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
enum RawKind {
    YoutubeVideo,
    SpotifyTopic,
}

// Some exports write view counts as numbers, others as preformatted text.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawViewCount {
    Text(String),
    Number(u64),
}

#[derive(Deserialize, Debug)]
struct RawItem {
    #[serde(rename = "type")]
    kind: RawKind,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail_url: String,
    #[serde(default)]
    embed_url: String,
    view_count: Option<RawViewCount>,
    published_at: Option<String>,
    video_url: Option<String>,
    track_title_clean: Option<String>,
}

type RawMusicData = BTreeMap<String, Vec<RawItem>>;

impl From<RawKind> for ItemKind {
    fn from(kind: RawKind) -> ItemKind {
        match kind {
            RawKind::YoutubeVideo => ItemKind::YoutubeVideo,
            RawKind::SpotifyTopic => ItemKind::SpotifyTopic,
        }
    }
}

impl RawItem {
    fn into_item(self, key: &str, position: usize) -> Result<MusicItem> {
        let published_at = match non_blank(self.published_at) {
            Some(value) => {
                let context = format!("published_at of item {position} under {key:?}");
                Some(dates::parse_release_date(&value, &context)?)
            }
            None => None,
        };
        let view_count = self.view_count.map(|count| match count {
            RawViewCount::Text(text) => text,
            RawViewCount::Number(n) => n.to_string(),
        });

        Ok(MusicItem {
            kind: self.kind.into(),
            artist: self.artist,
            title: self.title,
            thumbnail_url: self.thumbnail_url,
            embed_url: self.embed_url,
            view_count: non_blank(view_count),
            published_at,
            video_url: non_blank(self.video_url),
            track_title_clean: non_blank(self.track_title_clean),
        })
    }
}

/// Parses a `data.json` document into validated release days.
///
/// Keys naming the same calendar date (e.g. `2024-01-14` and
/// `2024-01-14T00:00:00Z`) are merged into one day.
pub fn parse_music_data(json: &str) -> Result<Vec<ReleaseDay>> {
    let raw: RawMusicData = serde_json::from_str(json)?;
    let mut days: BTreeMap<NaiveDate, Vec<MusicItem>> = BTreeMap::new();

    for (key, raw_items) in raw {
        let date = dates::parse_release_date(&key, "date key")?;
        let items = raw_items
            .into_iter()
            .enumerate()
            .map(|(position, raw_item)| raw_item.into_item(&key, position))
            .collect::<Result<Vec<_>>>()?;
        debug!("Parsed {} items for {key}", items.len());
        days.entry(date).or_default().extend(items);
    }

    Ok(days
        .into_iter()
        .map(|(date, items)| ReleaseDay { date, items })
        .collect())
}

/// The JSON document the site is generated from.
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Data file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DataFile { path: path.into() }
    }

    /// Uses `WTM_DATA_PATH` when set, the conventional `public/` location otherwise.
    pub fn try_default() -> Self {
        let path = env_value("WTM_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.into());
        DataFile::new(path)
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is there at all.
    pub async fn exists(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(&self.path).await?)
    }

    /// Reads and validates the data file.
    ///
    /// A missing file is not an error: the site is generated empty. Malformed
    /// JSON or an unparseable date is.
    pub async fn read_catalog(&self) -> Result<Catalog> {
        if !self.exists().await? {
            warn!(
                "{} not found, generating a site without releases",
                self.path.display()
            );
            return Ok(Catalog::default());
        }

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let days = parse_music_data(&contents)?;
        let catalog = Catalog::new(days);
        debug!(
            "Loaded {} releases from {}",
            catalog.len(),
            self.path.display()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::errors::Error;
    use crate::catalog::entities::tests::ymd;

    const SAMPLE: &str = r#"{
        "2024-01-12": [
            {"type": "spotify_topic", "artist": "Little Simz", "title": "Gorilla",
             "thumbnail_url": "https://img.example/simz.jpg", "embed_url": ""}
        ],
        "2024-01-14": [
            {"type": "youtube_video", "artist": "Dave", "title": "- Streatham",
             "thumbnail_url": "https://img.example/dave.jpg",
             "embed_url": "https://www.youtube.com/embed/abc123",
             "view_count": "1,204,331", "published_at": "2024-01-14T17:00:00Z",
             "video_url": "https://www.youtube.com/watch?v=abc123",
             "track_title_clean": "Streatham"}
        ]
    }"#;

    #[test]
    fn test_parse_music_data() {
        let days = parse_music_data(SAMPLE).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date, ymd(2024, 1, 14));

        let dave = &days[1].items[0];
        assert_eq!(dave.kind, ItemKind::YoutubeVideo);
        assert_eq!(dave.view_count.as_deref(), Some("1,204,331"));
        assert_eq!(dave.published_at, Some(ymd(2024, 1, 14)));
        assert_eq!(dave.track_title_clean.as_deref(), Some("Streatham"));

        let simz = &days[0].items[0];
        assert_eq!(simz.kind, ItemKind::SpotifyTopic);
        assert_eq!(simz.published_at, None);
        assert_eq!(simz.video_url, None);
    }

    #[test]
    fn test_numeric_view_count_and_missing_fields() {
        let days = parse_music_data(
            r#"{"2024-02-01": [{"type": "youtube_video", "view_count": 5120, "published_at": ""}]}"#,
        )
        .unwrap();
        let item = &days[0].items[0];
        assert_eq!(item.view_count.as_deref(), Some("5120"));
        assert_eq!(item.artist, "");
        assert_eq!(item.published_at, None);
    }

    #[test]
    fn test_keys_on_the_same_day_are_merged() {
        let days = parse_music_data(
            r#"{
                "2024-01-14": [{"type": "youtube_video", "artist": "A"}],
                "2024-01-14T00:00:00Z": [{"type": "youtube_video", "artist": "B"}]
            }"#,
        )
        .unwrap();
        assert_eq!(days.len(), 1);
        let artists: Vec<&str> = days[0].items.iter().map(|i| i.artist.as_str()).collect();
        assert_eq!(artists, vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_date_key_is_rejected() {
        let err = parse_music_data(r#"{"last friday": []}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { ref value, .. } if value == "last friday"));
    }

    #[test]
    fn test_invalid_published_at_is_rejected() {
        let err = parse_music_data(
            r#"{"2024-01-14": [{"type": "youtube_video", "published_at": "soon"}]}"#,
        )
        .unwrap_err();
        match err {
            Error::InvalidDate { value, context } => {
                assert_eq!(value, "soon");
                assert!(context.contains("2024-01-14"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let err = parse_music_data(r#"{"2024-01-14": [{"type": "podcast"}]}"#).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = DataFile::new(dir.path().join("data.json"));
        let catalog = data_file.read_catalog().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_read_catalog_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let catalog = DataFile::new(&path).read_catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.releases()[0].slug, "dave-streatham-abc123");
    }
}
