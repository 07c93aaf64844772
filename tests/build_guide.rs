//! End-to-end: local feed files -> builder -> XMLTV file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsontv::epg::{self, GuideBuilder};
use jsontv::fetcher::{DownloadConfig, Fetcher, UrlChecker};
use jsontv::{ChannelMap, GuideError};

struct NoLogos;

impl UrlChecker for NoLogos {
    fn is_reachable(&self, _url: &str) -> bool {
        false
    }
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("jsontv_it_{}_{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn write(&self, name: &str, content: &str) -> String {
        let path = self.0.join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

const GRID: &str = r#"{"channels":[{"channelId":"5","callSign":"ABC","channelNo":"5","events":[{"startTime":"1700000000","endTime":"1700003600","program":{"title":"News","shortDesc":"Daily news"}}]}]}"#;

const SCHEDULE: &str = r#"{"data":{"items":[
    {"channel":{"sourceId":"9","networkName":"Weather"},
     "programSchedules":[{"startTime":1700000000,"endTime":1700003600,"title":"Forecast"}]}
]}}"#;

const STREAMS: &str = r#"{"items":[{"content":{"streams":[
    {"channel":"5","title":"Late","start_date":"2023-11-15T04:00:00Z","end_date":"2023-11-15T05:00:00Z"},
    {"channel":"live-1","title":"Concert","start_date":"2023-11-15T04:00:00Z","end_date":"2023-11-15T06:00:00Z","description":"Live"}
]}}]}"#;

/// Mirror of the binary's run: fetch, build, render, write
fn run(urls: &[String], channel_map: Option<&str>, output: &Path) -> jsontv::Result<()> {
    let channel_map = channel_map.map(ChannelMap::load).transpose()?;
    let payloads = Fetcher::new(DownloadConfig::default(), true).fetch_all(urls)?;
    let document = GuideBuilder::new(epg::default_parsers(Arc::new(NoLogos), "https://logos"))
        .with_channel_map(channel_map)
        .build(&payloads)?;
    epg::write_guide(output, &epg::render(&document))
}

#[test]
fn converts_all_three_formats_into_one_guide() {
    let dir = TempDir::new("all");
    let urls = vec![
        dir.write("grid.json", GRID),
        dir.write("schedule.json", SCHEDULE),
        dir.write("streams.json", STREAMS),
    ];
    let map = dir.write(
        "map.json",
        r#"{"channels":[{"channel":{"name":"Weather Now","channelId":"9"}}]}"#,
    );
    let output = dir.path("out/guide.xml");

    run(&urls, Some(map.as_str()), &output).unwrap();
    let xml = std::fs::read_to_string(&output).unwrap();

    assert_eq!(xml.matches("<channel ").count(), 3);
    assert_eq!(xml.matches("<programme ").count(), 4);
    assert!(xml.contains("<display-name>5 ABC</display-name>"));
    assert!(xml.contains("<display-name>Weather Now</display-name>"));
    assert!(xml.contains("<display-name>live-1</display-name>"));
    assert!(xml.contains(r#"start="20231114221320 +0000""#));
    assert!(!xml.contains("<icon "));

    // Channel order follows feed order
    let abc = xml.find(r#"<channel id="5">"#).unwrap();
    let weather = xml.find(r#"<channel id="9">"#).unwrap();
    let live = xml.find(r#"<channel id="live-1">"#).unwrap();
    assert!(abc < weather && weather < live);
}

#[test]
fn unsupported_feed_writes_nothing() {
    let dir = TempDir::new("unsupported");
    let urls = vec![dir.write("grid.json", GRID), dir.write("foo.json", r#"{"foo":"bar"}"#)];
    let output = dir.path("guide.xml");

    let err = run(&urls, None, &output).unwrap_err();
    assert!(matches!(err, GuideError::UnsupportedFormat { index: 1 }));
    assert!(!output.exists());
}

#[test]
fn malformed_feed_writes_nothing() {
    let dir = TempDir::new("malformed");
    let urls = vec![dir.write("bad.json", "{\"channels\": [")];
    let output = dir.path("guide.xml");

    let err = run(&urls, None, &output).unwrap_err();
    assert!(matches!(err, GuideError::MalformedInput { index: 0, .. }));
    assert!(!output.exists());
}

#[test]
fn missing_channel_map_fails_before_fetching() {
    let dir = TempDir::new("nomap");
    // The feed path does not exist either; the map error must win
    let urls = vec![dir.path("never-fetched.json").to_string_lossy().to_string()];
    let output = dir.path("guide.xml");

    let map = dir.path("missing-map.json").to_string_lossy().to_string();
    let err = run(&urls, Some(map.as_str()), &output).unwrap_err();
    assert!(matches!(err, GuideError::Config(_)));
    assert!(!output.exists());
}

#[test]
fn build_entry_point_loads_map() {
    let dir = TempDir::new("entry");
    let map = dir.write(
        "map.json",
        r#"{"channels":[{"channel":{"name":"ABC HD","channelId":"5"}}]}"#,
    );

    let doc = epg::build(
        &[GRID],
        Some(map.as_str()),
        epg::default_parsers(Arc::new(NoLogos), "https://logos"),
    )
    .unwrap();
    assert_eq!(doc.channels()[0].display_name, "ABC HD");
}
