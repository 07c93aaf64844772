//! Guide builder: folds every payload into one document, in input order

use serde_json::Value;

use super::model::Document;
use super::parsers::GuideParser;
use crate::channel_map::ChannelMap;
use crate::error::{GuideError, Result};

pub struct GuideBuilder {
    parsers: Vec<Box<dyn GuideParser>>,
    channel_map: Option<ChannelMap>,
}

impl GuideBuilder {
    pub fn new(parsers: Vec<Box<dyn GuideParser>>) -> Self {
        Self {
            parsers,
            channel_map: None,
        }
    }

    pub fn with_channel_map(mut self, channel_map: Option<ChannelMap>) -> Self {
        self.channel_map = channel_map;
        self
    }

    /// Load the channel map from `path` (if any) before anything else runs
    pub fn with_channel_map_path(self, path: Option<&str>) -> Result<Self> {
        let map = path.map(ChannelMap::load).transpose()?;
        Ok(self.with_channel_map(map))
    }

    /// First registered parser that claims the payload
    fn select(&self, payload: &Value) -> Option<&dyn GuideParser> {
        self.parsers
            .iter()
            .map(|p| &**p)
            .find(|p| p.can_parse(payload))
    }

    /// Parse every payload and merge the results. Any malformed or
    /// unrecognised payload aborts the whole build.
    pub fn build<S: AsRef<str>>(&self, payloads: &[S]) -> Result<Document> {
        let mut document = Document::new();

        for (index, raw) in payloads.iter().enumerate() {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                log::warn!("Feed #{} is empty, skipping", index);
                continue;
            }

            let payload: Value = serde_json::from_str(raw)
                .map_err(|source| GuideError::MalformedInput { index, source })?;
            let parser = self
                .select(&payload)
                .ok_or(GuideError::UnsupportedFormat { index })?;

            let (channels_before, programmes_before) =
                (document.channel_count(), document.programme_count());
            parser.extract(&mut document, &payload, self.channel_map.as_ref());

            log::info!(
                "Feed #{} parsed as {}: {} new channels, {} programmes",
                index,
                parser.name(),
                document.channel_count() - channels_before,
                document.programme_count() - programmes_before
            );
        }

        Ok(document)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
