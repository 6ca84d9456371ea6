//! WTM - static site generator for a date-grouped music video feed
//!
//! This library turns a single `data.json` document of music releases into a
//! statically exported site: a paginated home feed, one page per video,
//! a few content pages and a sitemap. A small preview server can serve the
//! result.

/// Music data model, slugs and pagination
pub mod catalog;
/// Static export of the whole site
pub mod generator;
/// Preview HTTP server for an exported site
pub mod server;
/// HTML, XML and JSON-LD rendering
pub mod site;
