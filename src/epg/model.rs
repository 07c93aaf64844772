//! In-memory TV guide: channels followed by programmes, in insertion order

use std::collections::HashSet;

use super::time::Timestamp;

/// Channel information for the output guide
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Feed-specific channel ID, unique within a document
    pub id: String,
    /// Display name
    pub display_name: String,
    /// Channel icon/logo URL (optional)
    pub icon: Option<String>,
}

/// A single scheduled broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct Programme {
    /// Channel ID this programme belongs to
    pub channel_id: String,
    pub start: Timestamp,
    pub stop: Timestamp,
    /// Programme title
    pub title: String,
    /// Programme description (optional)
    pub description: Option<String>,
}

/// The guide being assembled for one run
#[derive(Debug, Clone, Default)]
pub struct Document {
    channels: Vec<Channel>,
    programmes: Vec<Programme>,
    channel_ids: HashSet<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel unless one with the same id is already present.
    /// Returns false when the channel was discarded.
    pub fn add_channel(&mut self, channel: Channel) -> bool {
        if self.channel_ids.contains(&channel.id) {
            return false;
        }
        self.channel_ids.insert(channel.id.clone());
        self.channels.push(channel);
        true
    }

    pub fn has_channel(&self, id: &str) -> bool {
        self.channel_ids.contains(id)
    }

    pub fn add_programme(&mut self, programme: Programme) {
        self.programmes.push(programme);
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn programmes(&self) -> &[Programme] {
        &self.programmes
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn programme_count(&self) -> usize {
        self.programmes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, name: &str) -> Channel {
        Channel {
            id: id.to_string(),
            display_name: name.to_string(),
            icon: None,
        }
    }

    #[test]
    fn test_first_channel_wins() {
        let mut doc = Document::new();
        assert!(doc.add_channel(channel("1", "First")));
        assert!(!doc.add_channel(channel("1", "Second")));
        assert!(doc.add_channel(channel("2", "Other")));

        assert_eq!(doc.channel_count(), 2);
        assert_eq!(doc.channels()[0].display_name, "First");
        assert!(doc.has_channel("2"));
        assert!(!doc.has_channel("3"));
    }
}
