use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::catalog::{dates, entities::MusicItem, errors::Result};

const FALLBACK: &str = "item";

/// Lowercases `value` and collapses every run of characters outside
/// `[a-z0-9]` into one hyphen, trimming hyphens at both ends.
///
/// An empty result falls back to `"item"`.
pub fn normalize(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK.to_string()
    } else {
        slug
    }
}

/// Strips the leading "- " marker some titles carry, then trims.
pub fn clean_title(title: &str) -> &str {
    title
        .strip_prefix('-')
        .map_or(title, str::trim_start)
        .trim()
}

/// Pulls the YouTube video id out of a watch, short or embed URL.
///
/// `video_url` wins over `embed_url` whenever it is non-empty.
pub fn extract_video_id<'a>(embed_url: Option<&'a str>, video_url: Option<&'a str>) -> Option<&'a str> {
    let url = video_url
        .filter(|url| !url.is_empty())
        .or(embed_url)
        .unwrap_or_default();

    let id = if let Some((_, rest)) = url.split_once("watch?v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest.split(['?', '&']).next()
    } else if let Some((_, rest)) = url.split_once("/embed/") {
        rest.split(['?', '&']).next()
    } else {
        None
    };

    id.filter(|id| !id.is_empty())
}

/// Canonical slug: `artist-title`, followed by the video id when the item
/// links to a YouTube video.
pub fn slug_for_item(item: &MusicItem) -> String {
    let base = format!(
        "{}-{}",
        normalize(&item.artist),
        normalize(clean_title(&item.title))
    );

    match extract_video_id(Some(item.embed_url.as_str()), item.video_url.as_deref()) {
        Some(id) if is_url_safe(id) => format!("{base}-{id}"),
        Some(id) => format!("{base}-{}", normalize(id)),
        None => base,
    }
}

/// Legacy slug: `artist-title-year`, the year taken from `published_at`.
pub fn generate_slug(artist: &str, title: &str, published_at: &str) -> Result<String> {
    let date = dates::parse_release_date(published_at, "published_at")?;
    Ok(generate_slug_for_date(artist, title, date))
}

/// Like [`generate_slug`] for an already parsed date.
pub fn generate_slug_for_date(artist: &str, title: &str, date: NaiveDate) -> String {
    normalize(&format!("{artist}-{}-{}", clean_title(title), date.year()))
}

fn is_url_safe(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Hands out unique slugs, suffixing repeats with `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct SlugIndex {
    taken: HashSet<String>,
}

impl SlugIndex {
    /// Returns `base`, or the first free suffixed form of it.
    pub fn assign(&mut self, base: String) -> String {
        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                debug!("Slug {base} already taken, using {candidate}");
                return candidate;
            }
            n += 1;
        }
    }

    /// Number of slugs handed out.
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether no slug was handed out yet.
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
