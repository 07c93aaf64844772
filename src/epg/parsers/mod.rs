//! Guide parsers, one per vendor JSON schema
//!
//! Each parser answers two questions: does this payload look like my schema,
//! and what channels and programmes does it contain. The builder tries them in
//! registration order and uses the first one that claims a payload.

mod grid;
mod schedule;
mod streams;

use std::sync::Arc;

use serde_json::Value;

use super::model::Document;
use crate::channel_map::ChannelMap;
use crate::fetcher::UrlChecker;

pub use grid::GridParser;
pub use schedule::{logo_url, ScheduleParser, DEFAULT_LOGO_BASE};
pub use streams::StreamsParser;

pub trait GuideParser: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Cheap structural check. Never panics on foreign input.
    fn can_parse(&self, payload: &Value) -> bool;

    /// Append the payload's channels and programmes to `document`.
    /// Channels whose id is already in the document are skipped.
    fn extract(&self, document: &mut Document, payload: &Value, channel_map: Option<&ChannelMap>);
}

/// All known parsers in the order they are tried
pub fn default_parsers(checker: Arc<dyn UrlChecker>, logo_base: &str) -> Vec<Box<dyn GuideParser>> {
    vec![
        Box::new(GridParser),
        Box::new(ScheduleParser::new(checker, logo_base)),
        Box::new(StreamsParser),
    ]
}

#[cfg(test)]
#[path = "parsers_tests.rs"]
mod tests;
