use std::fmt::Write;

use crate::site::SiteContext;

const LAYOUT: &str = include_str!("templates/layout.html");

/// Escapes text for use in HTML content and quoted attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replaces `{{KEY}}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so a value containing `{{BODY}}`
/// stays literal. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after_open[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Serializes JSON for an inline `<script>` block.
pub fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Sections linked from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// Home feed.
    Home,
    /// About page.
    About,
    /// Shop page.
    Shop,
    /// Tech blog.
    Tech,
    /// Pages not linked from the navigation.
    Unlisted,
}

const NAV_LINKS: [(Nav, &str, &str); 4] = [
    (Nav::Home, "/", "Home"),
    (Nav::About, "/about/", "About"),
    (Nav::Shop, "/shop/", "Shop"),
    (Nav::Tech, "/tech/", "Tech"),
];

/// Everything the shared layout needs for one page.
#[derive(Debug)]
pub struct Document {
    /// Page title, plain text.
    pub title: String,
    /// Meta description, plain text.
    pub description: String,
    /// Site-relative path, e.g. `/video/dave-streatham-abc123/`.
    pub path: String,
    /// `og:type`, `website` unless set.
    pub og_type: &'static str,
    /// Preview image for Open Graph and Twitter cards.
    pub image: Option<String>,
    /// Structured data, one `<script>` block each.
    pub json_ld: Vec<serde_json::Value>,
    /// Raw markup appended to `<head>`.
    pub head_extra: String,
    /// Highlighted navigation link.
    pub nav: Nav,
    /// Already rendered markup.
    pub body: String,
    /// Footer line, plain text.
    pub footer: String,
}

impl Document {
    /// A page with the default description, type and footer.
    pub fn new(title: impl Into<String>, path: impl Into<String>, body: String) -> Self {
        Document {
            title: title.into(),
            description: String::new(),
            path: path.into(),
            og_type: "website",
            image: None,
            json_ld: Vec::new(),
            head_extra: String::new(),
            nav: Nav::Unlisted,
            body,
            footer: "If you know, you know".to_string(),
        }
    }

    /// Fills the shared layout.
    pub fn render(&self, ctx: &SiteContext) -> String {
        let canonical = ctx.absolute_url(&self.path);

        let image_meta = match &self.image {
            Some(image) => {
                let image = escape(image);
                format!(
                    "  <meta property=\"og:image\" content=\"{image}\">\n  <meta name=\"twitter:image\" content=\"{image}\">\n"
                )
            }
            None => String::new(),
        };

        let mut head_extra = self.head_extra.clone();
        for value in &self.json_ld {
            let _ = writeln!(
                head_extra,
                "  <script type=\"application/ld+json\">{}</script>",
                script_json(value)
            );
        }

        let mut nav = String::new();
        for (section, href, label) in NAV_LINKS {
            let class = if section == self.nav { " class=\"active\"" } else { "" };
            let _ = writeln!(nav, "    <a href=\"{href}\"{class}>{label}</a>");
        }

        let title = escape(&self.title);
        let description = escape(&self.description);
        let canonical = escape(&canonical);
        let site_name = escape(&ctx.name);
        let footer = escape(&self.footer);

        fill_template(
            LAYOUT,
            &[
                ("TITLE", title.as_str()),
                ("DESCRIPTION", description.as_str()),
                ("CANONICAL", canonical.as_str()),
                ("OG_TYPE", self.og_type),
                ("SITE_NAME", site_name.as_str()),
                ("IMAGE_META", image_meta.as_str()),
                ("HEAD_EXTRA", head_extra.as_str()),
                ("NAV", nav.as_str()),
                ("BODY", self.body.as_str()),
                ("FOOTER", footer.as_str()),
            ],
        )
    }
}
