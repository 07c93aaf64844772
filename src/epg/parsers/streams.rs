//! Stream feeds: `items[].content.streams[]`, one entry per airing with ISO dates

use serde_json::Value;

use super::GuideParser;
use crate::channel_map::{self, ChannelMap};
use crate::epg::keys;
use crate::epg::model::{Channel, Document, Programme};
use crate::epg::time::normalize_iso_datetime;

pub struct StreamsParser;

fn streams_of(item: &Value) -> Option<&Vec<Value>> {
    item.get(keys::CONTENT)
        .and_then(|content| keys::array(content, keys::STREAMS))
}

impl GuideParser for StreamsParser {
    fn name(&self) -> &'static str {
        "streams"
    }

    fn can_parse(&self, payload: &Value) -> bool {
        let Some(streams) = keys::array(payload, keys::ITEMS)
            .and_then(|items| items.first())
            .and_then(streams_of)
        else {
            return false;
        };
        !streams.is_empty()
            && streams.iter().all(|s| {
                [keys::CHANNEL, keys::TITLE, keys::START_DATE, keys::END_DATE]
                    .iter()
                    .all(|key| keys::has(s, key))
            })
    }

    fn extract(&self, document: &mut Document, payload: &Value, channel_map: Option<&ChannelMap>) {
        let streams = keys::array(payload, keys::ITEMS)
            .into_iter()
            .flatten()
            .filter_map(streams_of)
            .flatten();

        for stream in streams {
            let Some(channel_id) = keys::text(stream, keys::CHANNEL) else {
                log::debug!("streams: entry without channel skipped");
                continue;
            };

            if !document.has_channel(&channel_id) {
                let display_name = channel_map::lookup(channel_map, &channel_id)
                    .unwrap_or(&channel_id)
                    .to_string();
                document.add_channel(Channel {
                    id: channel_id.clone(),
                    display_name,
                    icon: keys::text(stream, keys::THUMBNAIL),
                });
            }

            match stream_to_programme(&channel_id, stream) {
                Some(programme) => document.add_programme(programme),
                None => log::debug!("streams: incomplete entry on channel {} skipped", channel_id),
            }
        }
    }
}

fn stream_to_programme(channel_id: &str, stream: &Value) -> Option<Programme> {
    Some(Programme {
        channel_id: channel_id.to_string(),
        start: normalize_iso_datetime(&keys::text(stream, keys::START_DATE)?)?,
        stop: normalize_iso_datetime(&keys::text(stream, keys::END_DATE)?)?,
        title: keys::text(stream, keys::TITLE)?,
        description: keys::text(stream, keys::DESCRIPTION),
    })
}
