//! Error types for the guide pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a guide run
#[derive(Error, Debug)]
pub enum GuideError {
    /// Missing or invalid configuration (no feed URL, bad channel map, bad flag)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feed payload at `index` is not valid JSON
    #[error("Feed #{index} is not valid JSON: {source}")]
    MalformedInput {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// No registered parser recognised the payload at `index`
    #[error("Feed #{index} does not match any known guide format")]
    UnsupportedFormat { index: usize },

    /// Fetch failure
    #[error("Network error: {0}")]
    Network(String),

    /// The rendered guide could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GuideError>;
