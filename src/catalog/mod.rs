/// Loading and validating `data.json`
pub mod data_file;
/// Release date parsing and display
pub mod dates;
/// Music items, release days and the assembled catalog
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Feed pagination and date grouping
pub mod pagination;
/// URL slug derivation
pub mod slug;

pub use data_file::DataFile;
pub use entities::{Catalog, ItemKind, MusicItem, Release, ReleaseDay};
pub use pagination::Paginator;

/// Value of the environment variable `name`, with blank values treated as
/// unset.
pub fn env_value(name: &str) -> Option<String> {
    non_blank(std::env::var(name).ok())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
