//! EPG (Electronic Program Guide) module
//!
//! Detects which vendor JSON schema a feed uses, normalizes its channels and
//! programmes, and renders the merged result as XMLTV.

pub mod builder;
pub mod keys;
pub mod model;
pub mod parsers;
pub mod time;
pub mod xmltv;

// Re-export public types
pub use builder::GuideBuilder;
pub use model::{Channel, Document, Programme};
pub use parsers::{default_parsers, GuideParser};
pub use time::{normalize_iso_datetime, normalize_unix_seconds, Timestamp};
pub use xmltv::{render, write_guide};

use crate::error::Result;

/// Build one guide from raw payloads, loading the channel map first if a path is given
pub fn build<S: AsRef<str>>(
    payloads: &[S],
    channel_map_path: Option<&str>,
    parsers: Vec<Box<dyn GuideParser>>,
) -> Result<Document> {
    GuideBuilder::new(parsers)
        .with_channel_map_path(channel_map_path)?
        .build(payloads)
}
