//! Schedule feeds: `data.items[]`, each with a `channel` object and `programSchedules[]`
//!
//! These feeds carry no logos, so icons are guessed from a public logo
//! repository keyed by network name and kept only if the URL answers.

use std::sync::Arc;
use std::thread;

use serde_json::Value;

use super::GuideParser;
use crate::channel_map::{self, ChannelMap};
use crate::epg::keys;
use crate::epg::model::{Channel, Document, Programme};
use crate::epg::time::normalize_unix_seconds;
use crate::fetcher::UrlChecker;

pub const DEFAULT_LOGO_BASE: &str =
    "https://raw.githubusercontent.com/tv-logo/tv-logos/main/countries/united-states";

/// Upper bound on concurrent logo requests
const MAX_PARALLEL_LOGO_CHECKS: usize = 8;

pub struct ScheduleParser {
    checker: Arc<dyn UrlChecker>,
    logo_base: String,
}

/// One `data.items[]` entry that passed the id/name checks
struct Station<'a> {
    source_id: String,
    network_name: String,
    item: &'a Value,
}

impl ScheduleParser {
    pub fn new(checker: Arc<dyn UrlChecker>, logo_base: &str) -> Self {
        Self {
            checker,
            logo_base: logo_base.trim_end_matches('/').to_string(),
        }
    }

    /// Check candidate logos in parallel batches; result order matches `stations`
    fn resolve_icons(&self, stations: &[Station<'_>], document: &Document) -> Vec<Option<String>> {
        let mut icons = vec![None; stations.len()];

        // Stations already in the guide will not be emitted, skip the network call
        let candidates: Vec<(usize, String)> = stations
            .iter()
            .enumerate()
            .filter(|(_, station)| !document.has_channel(&station.source_id))
            .filter_map(|(i, station)| Some((i, logo_url(&self.logo_base, &station.network_name)?)))
            .collect();

        for batch in candidates.chunks(MAX_PARALLEL_LOGO_CHECKS) {
            thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|(i, url)| {
                        let checker = &self.checker;
                        (*i, url, scope.spawn(move || checker.is_reachable(url)))
                    })
                    .collect();

                for (i, url, handle) in handles {
                    if handle.join().unwrap_or(false) {
                        icons[i] = Some(url.clone());
                    } else {
                        log::debug!("schedule: no logo at {}", url);
                    }
                }
            });
        }

        icons
    }
}

impl GuideParser for ScheduleParser {
    fn name(&self) -> &'static str {
        "schedule"
    }

    fn can_parse(&self, payload: &Value) -> bool {
        let Some(first) = payload
            .get(keys::DATA)
            .and_then(|data| keys::array(data, keys::ITEMS))
            .and_then(|items| items.first())
        else {
            return false;
        };
        first
            .get(keys::CHANNEL)
            .is_some_and(|ch| keys::has(ch, keys::SOURCE_ID) && keys::has(ch, keys::NETWORK_NAME))
    }

    fn extract(&self, document: &mut Document, payload: &Value, channel_map: Option<&ChannelMap>) {
        let Some(items) = payload
            .get(keys::DATA)
            .and_then(|data| keys::array(data, keys::ITEMS))
        else {
            return;
        };

        // Dedup by sourceId (first wins), then order by network name
        let mut seen = std::collections::HashSet::new();
        let mut stations: Vec<Station<'_>> = items
            .iter()
            .filter_map(|item| {
                let channel = item.get(keys::CHANNEL)?;
                Some(Station {
                    source_id: keys::text(channel, keys::SOURCE_ID)?,
                    network_name: keys::text(channel, keys::NETWORK_NAME)?,
                    item,
                })
            })
            .filter(|station| seen.insert(station.source_id.clone()))
            .collect();
        stations.sort_by(|a, b| a.network_name.cmp(&b.network_name));

        let icons = self.resolve_icons(&stations, document);

        for (station, icon) in stations.iter().zip(icons) {
            let display_name = channel_map::lookup(channel_map, &station.source_id)
                .unwrap_or(&station.network_name)
                .to_string();

            document.add_channel(Channel {
                id: station.source_id.clone(),
                display_name,
                icon,
            });

            for schedule in keys::array(station.item, keys::PROGRAM_SCHEDULES).into_iter().flatten() {
                match schedule_to_programme(&station.source_id, schedule) {
                    Some(programme) => document.add_programme(programme),
                    None => log::debug!(
                        "schedule: incomplete entry on channel {} skipped",
                        station.source_id
                    ),
                }
            }
        }
    }
}

fn schedule_to_programme(channel_id: &str, schedule: &Value) -> Option<Programme> {
    Some(Programme {
        channel_id: channel_id.to_string(),
        start: normalize_unix_seconds(&keys::text(schedule, keys::START_TIME)?)?,
        stop: normalize_unix_seconds(&keys::text(schedule, keys::END_TIME)?)?,
        title: keys::text(schedule, keys::TITLE)?,
        description: None,
    })
}

/// Candidate logo URL: `<base>/<network-name>-us.png`, where the name is
/// lower-cased and every run of other characters becomes a single `-`
pub fn logo_url(base: &str, network_name: &str) -> Option<String> {
    let mut slug = String::with_capacity(network_name.len());
    for c in network_name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        return None;
    }
    Some(format!("{}/{}-us.png", base.trim_end_matches('/'), slug))
}
