//! Channel map: feed channel id -> human readable display name

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::epg::keys;
use crate::error::{GuideError, Result};

#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    names: HashMap<String, String>,
}

impl ChannelMap {
    /// Load a channel map file of the form
    /// `{"channels": [{"channel": {"name": "...", "channelId": "..."}}]}`.
    /// Entries missing a name or id are skipped.
    pub fn load(path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(GuideError::Config("channel map path is empty".to_string()));
        }
        if !Path::new(path).is_file() {
            return Err(GuideError::Config(format!(
                "channel map file not found: {}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GuideError::Config(format!("cannot read channel map {}: {}", path, e))
        })?;
        let map = Self::from_json(&content)
            .map_err(|msg| GuideError::Config(format!("{}: {}", path, msg)))?;

        log::info!("Loaded {} channel mappings from {}", map.len(), path);
        Ok(map)
    }

    /// Parse channel map content already in memory
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| format!("channel map is not valid JSON: {}", e))?;
        if !root.is_object() {
            return Err("channel map must be a JSON object".to_string());
        }
        let entries = keys::array(&root, keys::CHANNELS)
            .ok_or_else(|| format!("channel map has no '{}' array", keys::CHANNELS))?;

        let mut names = HashMap::with_capacity(entries.len());
        for entry in entries {
            let Some(channel) = entry.get(keys::CHANNEL) else {
                continue;
            };
            let (Some(name), Some(id)) = (
                keys::text(channel, keys::NAME),
                keys::text(channel, keys::CHANNEL_ID),
            ) else {
                continue;
            };
            names.entry(id).or_insert(name);
        }

        Ok(Self { names })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Look up a display name; no map simply means no override
pub fn lookup<'a>(map: Option<&'a ChannelMap>, id: &str) -> Option<&'a str> {
    map?.get(id)
}

#[cfg(test)]
#[path = "channel_map_tests.rs"]
mod tests;
