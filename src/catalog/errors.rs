use thiserror::Error;

/// Everything that can go wrong while loading, rendering or serving.
#[derive(Error, Debug)]
pub enum Error {
    /// `data.json` is not valid JSON or has the wrong shape.
    #[error("Failed to parse music data, error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A date key or `published_at` value that is not a date.
    #[error("Invalid date {value:?} in {context}")]
    InvalidDate { value: String, context: String },

    /// A setting, flag or environment variable has an unusable value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Reading the data file or writing the export failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Some output files could not be written.
    #[error("Build error: {0}")]
    BuildError(String),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ConfigurationError(format!("invalid site URL: {err}"))
    }
}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
