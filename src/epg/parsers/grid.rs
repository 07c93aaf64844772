//! Grid feeds: `channels[]` with call signs, each carrying its own `events[]`

use serde_json::Value;

use super::GuideParser;
use crate::channel_map::{self, ChannelMap};
use crate::epg::keys;
use crate::epg::model::{Channel, Document, Programme};
use crate::epg::time::normalize_unix_seconds;

pub struct GridParser;

impl GuideParser for GridParser {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn can_parse(&self, payload: &Value) -> bool {
        let Some(channels) = keys::array(payload, keys::CHANNELS) else {
            return false;
        };
        !channels.is_empty()
            && channels.iter().all(|ch| {
                keys::has(ch, keys::CALL_SIGN)
                    && keys::has(ch, keys::CHANNEL_ID)
                    && keys::array(ch, keys::EVENTS).is_some()
                    && !keys::has(ch, keys::PROGRAM)
            })
    }

    fn extract(&self, document: &mut Document, payload: &Value, channel_map: Option<&ChannelMap>) {
        let Some(entries) = keys::array(payload, keys::CHANNELS) else {
            return;
        };

        // Dedup by channelId (first wins), then order by call sign
        let mut seen = std::collections::HashSet::new();
        let mut channels: Vec<(String, String, &Value)> = entries
            .iter()
            .filter_map(|ch| {
                let id = keys::text(ch, keys::CHANNEL_ID)?;
                let call_sign = keys::text(ch, keys::CALL_SIGN).unwrap_or_default();
                Some((id, call_sign, ch))
            })
            .filter(|(id, _, _)| seen.insert(id.clone()))
            .collect();
        channels.sort_by(|a, b| a.1.cmp(&b.1));

        for (id, call_sign, entry) in channels {
            let display_name = match channel_map::lookup(channel_map, &id) {
                Some(name) => name.to_string(),
                None => {
                    let number = keys::text(entry, keys::CHANNEL_NO).unwrap_or_default();
                    format!("{} {}", number, call_sign).trim().to_string()
                }
            };
            if display_name.is_empty() {
                log::debug!("grid: channel {} has no usable name, skipped", id);
                continue;
            }

            document.add_channel(Channel {
                id: id.clone(),
                display_name,
                icon: keys::text(entry, keys::THUMBNAIL).map(|t| absolute_icon_url(&t)),
            });

            for event in keys::array(entry, keys::EVENTS).into_iter().flatten() {
                match event_to_programme(&id, event) {
                    Some(programme) => document.add_programme(programme),
                    None => log::debug!("grid: incomplete event on channel {} skipped", id),
                }
            }
        }
    }
}

fn event_to_programme(channel_id: &str, event: &Value) -> Option<Programme> {
    let start = normalize_unix_seconds(&keys::text(event, keys::START_TIME)?)?;
    let stop = normalize_unix_seconds(&keys::text(event, keys::END_TIME)?)?;
    let program = event.get(keys::PROGRAM)?;
    let title = keys::text(program, keys::TITLE)?;

    Some(Programme {
        channel_id: channel_id.to_string(),
        start,
        stop,
        title,
        description: keys::text(program, keys::SHORT_DESC),
    })
}

/// Grid thumbnails are usually protocol-relative or bare host paths
fn absolute_icon_url(url: &str) -> String {
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", url)
    }
}
