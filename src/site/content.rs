use std::fmt::Write;

use chrono::NaiveDate;

use crate::catalog::slug;
use crate::site::html::escape;

/// Opening paragraph of the About page.
pub const ABOUT_INTRO: &str = "IFUNO is a UK music discovery site, spotlighting everything from \
underground talent to established legacy artists. We follow artists on their way to mass \
popularity, small acts with cult followings, and the names that shaped the scene.";

/// Heading and text pairs of the About page.
pub const ABOUT_SECTIONS: [(&str, &str); 2] = [
    (
        "Our Mission",
        "To find the underground gems and rising stars before they hit the mainstream. \
UK rap, UK drill, grime and underground: the feed covers all of it.",
    ),
    (
        "If You Know, You Know",
        "From bedroom producers to street rappers, from indie darlings to experimental \
artists. The feed is updated daily with the latest releases and music videos.",
    ),
];

/// Text of the Shop placeholder.
pub const SHOP_BLURB: &str = "Exclusive merchandise, limited edition drops and official gear \
from the artists you need to know about. The shop is not open yet.";

/// A post on the Tech page.
#[derive(Debug, Clone)]
pub struct BlogPost {
    /// Stable numeric id, prefix of the slug.
    pub id: &'static str,
    /// Post title.
    pub title: &'static str,
    /// Teaser shown on the index.
    pub excerpt: &'static str,
    /// Paragraphs separated by blank lines, `## ` headings, `• ` bullets.
    pub content: &'static str,
    /// Author name.
    pub author: &'static str,
    /// Publication date.
    pub published_at: NaiveDate,
    /// Tags shown under the post.
    pub tags: &'static [&'static str],
    /// Reading time, e.g. "8 min read".
    pub read_time: &'static str,
    /// Highlighted on the index.
    pub featured: bool,
}

impl BlogPost {
    /// `<id>-<normalized title>`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.id, slug::normalize(self.title))
    }

    /// Site path of the post.
    pub fn path(&self) -> String {
        format!("/tech/{}/", self.slug())
    }
}

const OPENWEBUI_POST: &str = "Power users are moving toward self-hosted AI tooling for privacy, \
personalization and long-term control. OpenWebUI is one of the friendliest ways in.

## What is OpenWebUI?

OpenWebUI is an open-source, self-hostable interface for local or remote language models. \
It runs on top of Ollama or Docker and lets you pick the model and shape the interface.

## Why use custom models?

• Privacy: no third party sees your prompts
• Speed: small local models answer quickly
• Personalization: tune a model to your niche, music included
• Offline access and no per-token bills

## Putting an agent on your own domain

A Web3 domain can point at a locally hosted OpenWebUI agent, giving it a stable identity \
that you control and can share through public or private gateways.

## A music use case

A curator of UK underground music could fine-tune an open model on their own notes and \
let fans and journalists ask it for recommendations.";

/// Posts shown on the Tech page, newest first.
pub fn tech_posts() -> Vec<BlogPost> {
    vec![BlogPost {
        id: "1",
        title: "Custom OpenWebUI Models on Your Own Agent Domain",
        excerpt: "Self-hosted language models are becoming practical. Here is how OpenWebUI fits \
in, and why running your own model on your own domain is worth a look.",
        content: OPENWEBUI_POST,
        author: "IFUNO Tech",
        published_at: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default(),
        tags: &["OpenWebUI", "LLM", "Ollama", "SelfHosted", "Web3"],
        read_time: "5 min read",
        featured: true,
    }]
}

/// Renders a post body: blank-line separated blocks become paragraphs,
/// `## ` lines headings and runs of `• ` lines a list.
pub fn render_post_body(content: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut bullets: Vec<&str> = Vec::new();

    for line in content.lines().map(str::trim) {
        if let Some(item) = line.strip_prefix('•') {
            flush_paragraph(&mut html, &mut paragraph);
            bullets.push(item.trim());
            continue;
        }
        flush_bullets(&mut html, &mut bullets);

        if line.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
        } else if let Some(heading) = line.strip_prefix("## ") {
            flush_paragraph(&mut html, &mut paragraph);
            let _ = writeln!(html, "<h2>{}</h2>", escape(heading));
        } else {
            paragraph.push(line);
        }
    }
    flush_bullets(&mut html, &mut bullets);
    flush_paragraph(&mut html, &mut paragraph);
    html
}

fn flush_paragraph(html: &mut String, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape(&lines.join(" ")));
        lines.clear();
    }
}

fn flush_bullets(html: &mut String, items: &mut Vec<&str>) {
    if !items.is_empty() {
        html.push_str("<ul>\n");
        for item in items.iter() {
            let _ = writeln!(html, "<li>{}</li>", escape(item));
        }
        html.push_str("</ul>\n");
        items.clear();
    }
}
