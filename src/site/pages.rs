use std::fmt::Write;

use crate::catalog::{
    dates,
    entities::{ItemKind, Release},
    pagination::{PageView, page_path},
};
use crate::site::{
    SiteContext,
    content::{self, BlogPost},
    html::{Document, Nav, escape},
    seo,
};

const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

fn card(out: &mut String, release: &Release) {
    let item = &release.item;
    let title = item.display_title();
    let label = format!("{} \u{2013} {}", item.artist, title);

    let _ = writeln!(
        out,
        "<a class=\"card {kind}\" href=\"{href}\" data-player-card data-embed=\"{embed}\" \
data-artist=\"{artist}\" data-title=\"{title}\" data-thumbnail=\"{thumb}\">",
        kind = item.kind.as_str(),
        href = escape(&release.path()),
        embed = escape(&item.embed_url),
        artist = escape(&item.artist),
        title = escape(title),
        thumb = escape(&item.thumbnail_url),
    );
    let _ = writeln!(
        out,
        "  <div class=\"art\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
        escape(&item.thumbnail_url),
        escape(&format!("{} - {}", item.artist, title))
    );
    if item.kind == ItemKind::YoutubeVideo {
        out.push_str("    <span class=\"badge\">Video</span>\n");
    }
    out.push_str("  </div>\n");
    let _ = writeln!(out, "  <p class=\"label\">{}</p>", escape(&label));
    if item.kind == ItemKind::YoutubeVideo {
        if let Some(views) = &item.view_count {
            let _ = writeln!(out, "  <p class=\"views\">{} views</p>", escape(views));
        }
    }
    out.push_str("</a>\n");
}

/// One page of the home feed.
pub fn home_page(ctx: &SiteContext, view: &PageView<'_, Release>) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<header class=\"feed-header\"><h1>WTM</h1><span class=\"release-count\">{} releases</span></header>",
        view.total_items
    );

    if view.is_empty() {
        body.push_str("<p class=\"empty\">No music releases found.</p>\n");
    }

    for section in &view.sections {
        body.push_str("<section class=\"date-section\">\n");
        let _ = writeln!(body, "<h2>{}</h2>", dates::format_long(section.date));
        body.push_str("<div class=\"grid\">\n");
        for release in &section.items {
            card(&mut body, release);
        }
        body.push_str("</div>\n</section>\n");
    }

    if view.has_navigation() {
        body.push_str("<nav class=\"pagination\">\n");
        match view.previous() {
            Some(prev) => {
                let _ = writeln!(body, "<a href=\"{}\" rel=\"prev\">Previous</a>", page_path(prev));
            }
            None => body.push_str("<span class=\"disabled\">Previous</span>\n"),
        }
        let _ = writeln!(
            body,
            "<span>Page {} of {}</span>",
            view.index + 1,
            view.total_pages
        );
        match view.next() {
            Some(next) => {
                let _ = writeln!(body, "<a href=\"{}\" rel=\"next\">Next</a>", page_path(next));
            }
            None => body.push_str("<span class=\"disabled\">Next</span>\n"),
        }
        body.push_str("</nav>\n");
    }

    let mut title = seo::home_title(ctx);
    if view.index > 0 {
        let _ = write!(title, " | Page {}", view.index + 1);
    }

    let mut doc = Document::new(title, page_path(view.index), body);
    doc.description = seo::HOME_DESCRIPTION.to_string();
    doc.nav = Nav::Home;
    doc.head_extra = seo::keywords_meta(&seo::SITE_KEYWORDS);
    doc.json_ld.push(seo::website_json_ld(ctx));
    doc.render(ctx)
}

/// Detail page for one release.
pub fn video_page(ctx: &SiteContext, release: &Release, related: &[&Release]) -> String {
    let item = &release.item;
    let title = item.display_title();
    let year = release.year();
    let artist = escape(&item.artist);
    let clean = escape(title);

    let mut body = String::new();
    body.push_str("<a href=\"/\">&larr; Back to Home</a>\n");
    body.push_str("<article class=\"panel\">\n");
    let _ = writeln!(
        body,
        "<h1>{artist} - {clean} [{year}] Official Video &amp; Lyrics</h1>"
    );
    body.push_str("<p class=\"meta\">");
    let _ = write!(
        body,
        "<span>{}</span>",
        dates::format_long(release.published())
    );
    if let Some(views) = &item.view_count {
        let _ = write!(body, " &middot; <span>{} views</span>", escape(views));
    }
    let _ = writeln!(body, " &middot; <span>{year}</span></p>");

    body.push_str("<div class=\"chips\">");
    for modifier in &seo::SEO_MODIFIERS[..12] {
        let _ = write!(body, "<span>{modifier}</span>");
    }
    body.push_str("</div>\n");

    body.push_str("<div class=\"video-frame\">\n");
    if item.embed_url.is_empty() {
        let _ = writeln!(
            body,
            "<img src=\"{}\" alt=\"{artist} - {clean}\">\n<p>Video not available</p>",
            escape(&item.thumbnail_url)
        );
    } else {
        let _ = writeln!(
            body,
            "<iframe src=\"{}\" title=\"{artist} - {clean}\" allow=\"{IFRAME_ALLOW}\" allowfullscreen></iframe>",
            escape(&item.embed_url)
        );
    }
    body.push_str("</div>\n");

    body.push_str("<h2>About This Track</h2>\n");
    let _ = writeln!(
        body,
        "<p>{clean} by {artist} - Experience the latest in UK music. This track represents the \
cutting edge of {year} UK rap, drill, grime, and underground music scene.</p>"
    );
    body.push_str("<h3>Track Details</h3>\n<ul class=\"details\">\n");
    let _ = writeln!(body, "<li><strong>Artist:</strong> {artist}</li>");
    let _ = writeln!(body, "<li><strong>Title:</strong> {clean}</li>");
    let _ = writeln!(body, "<li><strong>Year:</strong> {year}</li>");
    let _ = writeln!(body, "<li><strong>Type:</strong> {}</li>", item.kind.label());
    body.push_str("</ul>\n</article>\n");

    if !related.is_empty() {
        body.push_str("<section class=\"panel\">\n<h2>More UK Music Releases</h2>\n");
        body.push_str("<div class=\"grid related\">\n");
        for other in related {
            card(&mut body, other);
        }
        body.push_str("</div>\n</section>\n");
    }

    // crawlable but visually hidden
    body.push_str("<div class=\"sr-only\">\n");
    let _ = writeln!(body, "<h2>UK Music Database - Latest Releases {year}</h2>");
    let search_terms: Vec<String> = ["lyrics", "instrumental", "clean", "acapella", "type beat", "remix", "bts"]
        .iter()
        .map(|term| format!("{artist} {clean} {term}"))
        .collect();
    let _ = writeln!(
        body,
        "<h3>Search Terms</h3>\n<p>{}, UK rap {year}, UK drill {year}, grime {year}, underground music {year}</p>",
        search_terms.join(", ")
    );
    body.push_str("</div>\n");

    let mut doc = Document::new(seo::video_title(release), release.path(), body);
    doc.description = seo::video_description(release);
    doc.og_type = "video.other";
    doc.image = Some(item.thumbnail_url.clone()).filter(|url| !url.is_empty());
    doc.json_ld.push(seo::video_json_ld(ctx, release));
    doc.footer = format!("\u{a9} {year} {}. If you know, you know", ctx.name);
    doc.render(ctx)
}

/// Stand-in page at an old `artist-title-year` URL pointing at the
/// canonical page.
pub fn legacy_redirect_page(ctx: &SiteContext, release: &Release) -> String {
    let target = escape(&ctx.absolute_url(&release.path()));
    let path = escape(&release.path());
    format!(
        "<!DOCTYPE html>\n<html lang=\"en-GB\">\n<head>\n  <meta charset=\"utf-8\">\n  \
<title>Redirecting</title>\n  <link rel=\"canonical\" href=\"{target}\">\n  \
<meta name=\"robots\" content=\"noindex\">\n  <meta http-equiv=\"refresh\" content=\"0; url={path}\">\n\
</head>\n<body>\n  <p><a href=\"{path}\">{}</a></p>\n</body>\n</html>\n",
        escape(&format!("{} - {}", release.item.artist, release.item.display_title()))
    )
}

/// About page.
pub fn about_page(ctx: &SiteContext) -> String {
    let mut body = String::from("<h1>About</h1>\n<div class=\"panel\">\n");
    let _ = writeln!(body, "<p>{}</p>", escape(content::ABOUT_INTRO));
    for (heading, text) in content::ABOUT_SECTIONS {
        let _ = writeln!(body, "<h2>{}</h2>\n<p>{}</p>", escape(heading), escape(text));
    }
    body.push_str("<p class=\"meta\">Discover &bull; Support &bull; Celebrate</p>\n</div>\n");

    let mut doc = Document::new(format!("{} - About | UK Music Database", ctx.name), "/about/", body);
    doc.description = content::ABOUT_INTRO.to_string();
    doc.nav = Nav::About;
    doc.render(ctx)
}

/// Shop placeholder page.
pub fn shop_page(ctx: &SiteContext) -> String {
    let mut body = String::from("<h1>Shop</h1>\n<div class=\"panel\">\n<h2>Coming Soon</h2>\n");
    let _ = writeln!(body, "<p>{}</p>", escape(content::SHOP_BLURB));
    body.push_str("</div>\n");

    let mut doc = Document::new(format!("{} - Shop | UK Music Merchandise", ctx.name), "/shop/", body);
    doc.description = content::SHOP_BLURB.to_string();
    doc.nav = Nav::Shop;
    doc.render(ctx)
}

/// Tech blog index listing `posts`.
pub fn tech_index_page(ctx: &SiteContext, posts: &[BlogPost]) -> String {
    let mut body = String::from("<h1>Tech</h1>\n");
    for post in posts {
        let class = if post.featured { "panel featured" } else { "panel" };
        let _ = writeln!(body, "<article class=\"{class}\">");
        let _ = writeln!(
            body,
            "<h2><a href=\"{}\">{}</a></h2>",
            escape(&post.path()),
            escape(post.title)
        );
        let _ = writeln!(
            body,
            "<p class=\"meta\">{} &middot; {} &middot; {}</p>",
            escape(post.author),
            dates::format_long(post.published_at),
            escape(post.read_time)
        );
        let _ = writeln!(body, "<p>{}</p>", escape(post.excerpt));
        body.push_str("</article>\n");
    }

    let mut doc = Document::new(
        format!("{} - Tech Blog | AI, Web3, and Emerging Technologies", ctx.name),
        "/tech/",
        body,
    );
    doc.description = "Notes on AI, Web3 and the tools behind the site.".to_string();
    doc.nav = Nav::Tech;
    doc.render(ctx)
}

/// A single Tech blog post.
pub fn tech_post_page(ctx: &SiteContext, post: &BlogPost) -> String {
    let mut body = String::from("<a href=\"/tech/\">&larr; All posts</a>\n<article class=\"panel\">\n");
    let _ = writeln!(body, "<h1>{}</h1>", escape(post.title));
    let _ = writeln!(
        body,
        "<p class=\"meta\">{} &middot; {}</p>",
        dates::format_long(post.published_at),
        escape(post.read_time)
    );
    body.push_str(&content::render_post_body(post.content));
    body.push_str("<div class=\"chips\">");
    for tag in post.tags {
        let _ = write!(body, "<span>#{}</span>", escape(tag));
    }
    body.push_str("</div>\n</article>\n");

    let mut doc = Document::new(format!("{} | {} Tech", post.title, ctx.name), post.path(), body);
    doc.description = post.excerpt.to_string();
    doc.og_type = "article";
    doc.nav = Nav::Tech;
    doc.render(ctx)
}

/// Served for unknown paths, including slugs that match no release.
pub fn not_found_page(ctx: &SiteContext) -> String {
    let body = "<div class=\"empty\">\n<h1>Not found</h1>\n<p>This page or video does not exist.</p>\n\
<p><a href=\"/\">Back to the latest releases</a></p>\n</div>\n"
        .to_string();
    let mut doc = Document::new(format!("Not found | {}", ctx.name), "/404.html", body);
    doc.head_extra = "  <meta name=\"robots\" content=\"noindex\">\n".to_string();
    doc.render(ctx)
}
