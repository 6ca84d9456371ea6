use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::warn;

use crate::catalog::slug::{self, SlugIndex};

/// Where a music item is embedded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// YouTube music video.
    YoutubeVideo,
    /// Audio track from a topic channel or Spotify.
    SpotifyTopic,
}

impl ItemKind {
    /// Name used in `data.json` and as a CSS class.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::YoutubeVideo => "youtube_video",
            ItemKind::SpotifyTopic => "spotify_topic",
        }
    }

    /// Label shown in the track details block.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::YoutubeVideo => "Music Video",
            ItemKind::SpotifyTopic => "Audio Track",
        }
    }
}

/// One entry of a release day.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicItem {
    /// Where the item is embedded from.
    pub kind: ItemKind,
    /// Artist as credited.
    pub artist: String,
    /// Raw title, possibly with a leading "- ".
    pub title: String,
    /// Cover or video thumbnail.
    pub thumbnail_url: String,
    /// Player URL, empty when there is nothing to embed.
    pub embed_url: String,
    /// View count as displayed, e.g. "1,204,331".
    pub view_count: Option<String>,
    /// Release date, when the data has one.
    pub published_at: Option<NaiveDate>,
    /// Watch URL, preferred over `embed_url` for the video id.
    pub video_url: Option<String>,
    /// Title without featured artists or tags, when known.
    pub track_title_clean: Option<String>,
}

impl MusicItem {
    /// Title with the leading "- " marker removed.
    pub fn display_title(&self) -> &str {
        slug::clean_title(&self.title)
    }

    /// `view_count` reduced to its digits, e.g. "1,234,567" -> 1234567.
    pub fn view_count_number(&self) -> Option<u64> {
        let digits: String = self
            .view_count
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

/// All items released on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDay {
    /// Day the items were released.
    pub date: NaiveDate,
    /// In the order they appear in the data file.
    pub items: Vec<MusicItem>,
}

/// Anything that belongs to a release date, used to group feed sections.
pub trait Dated {
    /// Calendar date the value is filed under.
    fn date(&self) -> NaiveDate;
}

/// A music item placed in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    /// Feed day the release is listed under.
    pub day: NaiveDate,
    /// Canonical slug, unique within the catalog.
    pub slug: String,
    /// The item itself.
    pub item: MusicItem,
}

impl Release {
    /// `published_at` when the item has one, the feed day otherwise.
    pub fn published(&self) -> NaiveDate {
        self.item.published_at.unwrap_or(self.day)
    }

    /// Year of [`Release::published`].
    pub fn year(&self) -> i32 {
        self.published().year()
    }

    /// Slug in the older `artist-title-year` form.
    pub fn legacy_slug(&self) -> String {
        slug::generate_slug_for_date(&self.item.artist, &self.item.title, self.published())
    }

    /// Site path of the detail page.
    pub fn path(&self) -> String {
        format!("/video/{}/", self.slug)
    }
}

impl Dated for Release {
    fn date(&self) -> NaiveDate {
        self.day
    }
}

/// The validated contents of a data file, ready for rendering.
#[derive(Debug, Default)]
pub struct Catalog {
    releases: Vec<Release>,
    by_slug: HashMap<String, usize>,
    legacy: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the feed from days in any order.
    ///
    /// Days are sorted newest first (items keep their order inside a day) and
    /// every release gets a unique canonical slug in that order. Legacy slugs
    /// are only kept when they point at a single release and do not shadow a
    /// canonical slug.
    pub fn new(mut days: Vec<ReleaseDay>) -> Self {
        days.sort_by(|a, b| b.date.cmp(&a.date));

        let mut slugs = SlugIndex::default();
        let releases: Vec<Release> = days
            .into_iter()
            .flat_map(|day| {
                let date = day.date;
                day.items.into_iter().map(move |item| (date, item))
            })
            .map(|(day, item)| Release {
                day,
                slug: slugs.assign(slug::slug_for_item(&item)),
                item,
            })
            .collect();

        let by_slug: HashMap<String, usize> = releases
            .iter()
            .enumerate()
            .map(|(index, release)| (release.slug.clone(), index))
            .collect();

        let mut legacy_candidates: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, release) in releases.iter().enumerate() {
            legacy_candidates
                .entry(release.legacy_slug())
                .or_default()
                .push(index);
        }
        let legacy = legacy_candidates
            .into_iter()
            .filter_map(|(legacy_slug, indexes)| {
                if by_slug.contains_key(&legacy_slug) {
                    return None;
                }
                if let [index] = indexes.as_slice() {
                    Some((legacy_slug, *index))
                } else {
                    warn!(
                        "Legacy slug {legacy_slug} is shared by {} releases, no redirect will be generated",
                        indexes.len()
                    );
                    None
                }
            })
            .collect();

        Catalog {
            releases,
            by_slug,
            legacy,
        }
    }

    /// Every release in feed order.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Number of releases.
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Whether the feed has no releases.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Release with the canonical `slug`, if any.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Release> {
        self.by_slug.get(slug).map(|&index| &self.releases[index])
    }

    /// Resolves an old `artist-title-year` slug to the release it named.
    pub fn resolve_legacy(&self, legacy_slug: &str) -> Option<&Release> {
        self.legacy.get(legacy_slug).map(|&index| &self.releases[index])
    }

    /// Legacy slug and target release pairs, sorted by legacy slug.
    pub fn legacy_aliases(&self) -> Vec<(&str, &Release)> {
        let mut aliases: Vec<(&str, &Release)> = self
            .legacy
            .iter()
            .map(|(slug, &index)| (slug.as_str(), &self.releases[index]))
            .collect();
        aliases.sort_by(|a, b| a.0.cmp(b.0));
        aliases
    }

    /// The most recently published releases other than `current`.
    pub fn related(&self, current: &Release, limit: usize) -> Vec<&Release> {
        let mut others: Vec<&Release> = self
            .releases
            .iter()
            .filter(|release| release.slug != current.slug)
            .collect();
        others.sort_by(|a, b| b.published().cmp(&a.published()));
        others.truncate(limit);
        others
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(artist: &str, title: &str, embed_url: &str) -> MusicItem {
        MusicItem {
            kind: ItemKind::YoutubeVideo,
            artist: artist.to_string(),
            title: title.to_string(),
            thumbnail_url: format!("https://img.example/{artist}.jpg"),
            embed_url: embed_url.to_string(),
            view_count: None,
            published_at: None,
            video_url: None,
            track_title_clean: None,
        }
    }

    pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            ReleaseDay {
                date: ymd(2024, 1, 12),
                items: vec![item("Ghetts", "Mozambique", "https://www.youtube.com/embed/old1")],
            },
            ReleaseDay {
                date: ymd(2024, 1, 14),
                items: vec![
                    item("Dave", "- Streatham", "https://www.youtube.com/embed/abc123"),
                    item("Central Cee", "Band4Band", "https://www.youtube.com/embed/xyz789"),
                ],
            },
        ])
    }

    #[test]
    fn test_days_are_flattened_newest_first() {
        let catalog = sample_catalog();
        let slugs: Vec<&str> = catalog.releases().iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "dave-streatham-abc123",
                "central-cee-band4band-xyz789",
                "ghetts-mozambique-old1"
            ]
        );
    }

    #[test]
    fn test_find_by_slug_and_missing_slug() {
        let catalog = sample_catalog();
        let release = catalog.find_by_slug("central-cee-band4band-xyz789").unwrap();
        assert_eq!(release.item.artist, "Central Cee");
        assert!(catalog.find_by_slug("nobody-nothing").is_none());
    }

    #[test]
    fn test_duplicate_slugs_get_suffixes() {
        let catalog = Catalog::new(vec![ReleaseDay {
            date: ymd(2024, 5, 1),
            items: vec![
                item("Dave", "Sprinter", ""),
                item("Dave", "Sprinter", ""),
                item("Dave", "Sprinter", ""),
            ],
        }]);
        let slugs: Vec<&str> = catalog.releases().iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["dave-sprinter", "dave-sprinter-2", "dave-sprinter-3"]);
    }

    #[test]
    fn test_legacy_slug_resolves_when_unambiguous() {
        let catalog = sample_catalog();
        let release = catalog.resolve_legacy("dave-streatham-2024").unwrap();
        assert_eq!(release.slug, "dave-streatham-abc123");
        assert_eq!(catalog.legacy_aliases().len(), 3);
    }

    #[test]
    fn test_ambiguous_legacy_slug_is_dropped() {
        let catalog = Catalog::new(vec![ReleaseDay {
            date: ymd(2024, 5, 1),
            items: vec![
                item("Dave", "Sprinter", "https://youtu.be/one"),
                item("Dave", "Sprinter", "https://youtu.be/two"),
            ],
        }]);
        assert!(catalog.resolve_legacy("dave-sprinter-2024").is_none());
        assert!(catalog.legacy_aliases().is_empty());
    }

    #[test]
    fn test_legacy_slug_never_shadows_a_canonical_slug() {
        let catalog = Catalog::new(vec![ReleaseDay {
            date: ymd(2024, 5, 1),
            items: vec![
                item("Dave", "Sprinter", "https://youtu.be/x1"),
                item("Dave", "Sprinter 2024", ""),
            ],
        }]);
        let slugs: Vec<&str> = catalog.releases().iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["dave-sprinter-x1", "dave-sprinter-2024"]);

        assert!(catalog.resolve_legacy("dave-sprinter-2024").is_none());
        assert!(
            !catalog
                .legacy_aliases()
                .iter()
                .any(|(alias, _)| *alias == "dave-sprinter-2024")
        );
        assert_eq!(
            catalog.find_by_slug("dave-sprinter-2024").unwrap().item.title,
            "Sprinter 2024"
        );
    }

    #[test]
    fn test_published_at_overrides_day() {
        let mut dated = item("Dave", "Titanium", "");
        dated.published_at = Some(ymd(2023, 12, 30));
        let catalog = Catalog::new(vec![ReleaseDay {
            date: ymd(2024, 1, 2),
            items: vec![dated],
        }]);
        let release = &catalog.releases()[0];
        assert_eq!(release.published(), ymd(2023, 12, 30));
        assert_eq!(release.day, ymd(2024, 1, 2));
        assert_eq!(release.legacy_slug(), "dave-titanium-2023");
    }

    #[test]
    fn test_related_excludes_current_and_respects_limit() {
        let catalog = sample_catalog();
        let current = &catalog.releases()[0];
        let related = catalog.related(current, 1);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "central-cee-band4band-xyz789");
        assert_eq!(catalog.related(current, 10).len(), 2);
    }

    #[test]
    fn test_view_count_number() {
        let mut with_views = item("Dave", "Sprinter", "");
        with_views.view_count = Some("1,234,567".to_string());
        assert_eq!(with_views.view_count_number(), Some(1_234_567));
        with_views.view_count = Some("n/a".to_string());
        assert_eq!(with_views.view_count_number(), None);
    }
}
