use serde_json::{Value, json};

use crate::catalog::entities::Release;
use crate::site::SiteContext;

/// Search modifiers appended to video titles and shown as tag chips.
pub const SEO_MODIFIERS: [&str; 20] = [
    "lyrics",
    "instrumental",
    "official video",
    "clean",
    "acapella",
    "audio",
    "320",
    "music video",
    "type beat",
    "remix",
    "bts",
    "behind the scenes",
    "uk rap",
    "uk drill",
    "grime",
    "underground",
    "new music",
    "latest",
    "visualizer",
    "lyric video",
];

/// Genres listed in JSON-LD.
pub const GENRES: [&str; 4] = ["UK Rap", "UK Drill", "Grime", "Underground"];

/// Keywords of the home feed.
pub const SITE_KEYWORDS: [&str; 12] = [
    "UK music",
    "UK rap",
    "UK drill",
    "grime",
    "underground music",
    "latest UK releases",
    "music videos",
    "lyrics",
    "instrumental",
    "official video",
    "UK music database",
    "UK underground rap",
];

/// Publisher logo.
pub const LOGO_URL: &str =
    "https://ik.imagekit.io/vv1coyjgq/IFUKNO%20large%20gap%202025.png?updatedAt=1751549577754";

/// Title of the home feed.
pub fn home_title(ctx: &SiteContext) -> String {
    format!(
        "{} - Latest UK Music Releases | UK Rap, Drill, Grime, Underground",
        ctx.name
    )
}

/// Meta description of the home feed.
pub const HOME_DESCRIPTION: &str = "Discover the newest UK music. Daily updates of UK rap, drill, \
grime, and underground music videos and songs.";

/// Title of a video page, padded with search modifiers.
pub fn video_title(release: &Release) -> String {
    format!(
        "{} - {} [{}] {} | UK Music",
        release.item.artist,
        release.item.display_title(),
        release.year(),
        SEO_MODIFIERS[..8].join(" | ")
    )
}

/// Meta description of a video page.
pub fn video_description(release: &Release) -> String {
    format!(
        "Listen to {}'s \"{}\" ({}). Discover the latest UK rap, grime, and underground \
releases. Updated daily with new music videos, lyrics, instrumentals, and more.",
        release.item.artist,
        release.item.display_title(),
        release.year()
    )
}

/// `<meta name="keywords">` tag for the given list.
pub fn keywords_meta(keywords: &[&str]) -> String {
    format!(
        "  <meta name=\"keywords\" content=\"{}\">\n",
        crate::site::html::escape(&keywords.join(", "))
    )
}

fn publisher(ctx: &SiteContext) -> Value {
    json!({
        "@type": "Organization",
        "name": ctx.name,
        "logo": {
            "@type": "ImageObject",
            "url": LOGO_URL,
        },
    })
}

/// `WebSite` structured data for the home feed.
pub fn website_json_ld(ctx: &SiteContext) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": ctx.name,
        "description": "Latest UK Music Releases - UK Rap, Drill, Grime, Underground",
        "url": ctx.absolute_url("/"),
        "publisher": publisher(ctx),
    })
}

/// `MusicVideoObject` for a video page, with a watch counter when the item
/// carries a view count.
pub fn video_json_ld(ctx: &SiteContext, release: &Release) -> Value {
    let item = &release.item;
    let title = item.display_title();
    let recording_name = item.track_title_clean.as_deref().unwrap_or(title);
    let published = release.published().format("%Y-%m-%d").to_string();

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "MusicVideoObject",
        "name": format!("{} - {}", item.artist, title),
        "description": format!(
            "{title} by {} - Official music video from {}. Part of the latest UK rap, drill, grime, and underground music releases.",
            item.artist,
            release.year()
        ),
        "thumbnailUrl": item.thumbnail_url,
        "embedUrl": item.embed_url,
        "uploadDate": published,
        "url": ctx.absolute_url(&release.path()),
        "genre": GENRES,
        "inLanguage": "en-GB",
        "creator": {
            "@type": "Person",
            "name": item.artist,
        },
        "publisher": publisher(ctx),
        "mainEntity": {
            "@type": "MusicRecording",
            "name": recording_name,
            "byArtist": {
                "@type": "Person",
                "name": item.artist,
            },
            "genre": GENRES,
            "datePublished": published,
            "inLanguage": "en-GB",
        },
    });

    if let Some(views) = item.view_count_number() {
        data["interactionStatistic"] = json!({
            "@type": "InteractionCounter",
            "interactionType": "https://schema.org/WatchAction",
            "userInteractionCount": views,
        });
    }
    data
}
