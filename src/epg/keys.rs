//! JSON field names used by the feed schemas, plus small lookup helpers

use serde_json::Value;

// Channel map file
pub const CHANNELS: &str = "channels";
pub const CHANNEL: &str = "channel";
pub const NAME: &str = "name";
pub const CHANNEL_ID: &str = "channelId";

// Grid feeds (channels[].events[])
pub const CALL_SIGN: &str = "callSign";
pub const CHANNEL_NO: &str = "channelNo";
pub const EVENTS: &str = "events";
pub const PROGRAM: &str = "program";
pub const SHORT_DESC: &str = "shortDesc";

// Schedule feeds (data.items[].programSchedules[])
pub const DATA: &str = "data";
pub const SOURCE_ID: &str = "sourceId";
pub const NETWORK_NAME: &str = "networkName";
pub const PROGRAM_SCHEDULES: &str = "programSchedules";

// Stream feeds (items[].content.streams[])
pub const CONTENT: &str = "content";
pub const STREAMS: &str = "streams";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const DESCRIPTION: &str = "description";

// Shared
pub const ITEMS: &str = "items";
pub const TITLE: &str = "title";
pub const START_TIME: &str = "startTime";
pub const END_TIME: &str = "endTime";
pub const THUMBNAIL: &str = "thumbnail";

/// Read a field as trimmed, non-empty text. Numbers are accepted as well,
/// since feeds are inconsistent about quoting ids and epoch times.
pub fn text(value: &Value, key: &str) -> Option<String> {
    let s = match value.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Field as an array, if present
pub fn array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key)?.as_array()
}

/// True if the field exists and is not null
pub fn has(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}
