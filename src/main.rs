//! jsontv - JSON TV guide feeds to XMLTV

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use clap::Parser;

use jsontv::config::{Cli, FileConfig, Settings};
use jsontv::epg::{self, GuideBuilder};
use jsontv::fetcher::{Fetcher, HttpChecker};
use jsontv::ChannelMap;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::resolve(Cli::parse(), FileConfig::load())?;

    run(&settings)?;
    Ok(())
}

fn run(settings: &Settings) -> jsontv::Result<()> {
    log::info!(
        "{} feed(s), output {}{}",
        settings.urls.len(),
        settings.output.display(),
        if settings.fake_data { " (fake data)" } else { "" }
    );

    // Validate the channel map before touching the network
    let channel_map = match settings.channel_map.as_deref() {
        Some(path) => Some(ChannelMap::load(path)?),
        None => {
            log::warn!("No channel map configured, using names from the feeds");
            None
        }
    };

    let download_config = settings.download_config();
    let fetcher = Fetcher::new(download_config.clone(), settings.fake_data);
    let payloads = fetcher.fetch_all(&settings.urls)?;

    let checker = Arc::new(HttpChecker::new(&download_config));
    let document = GuideBuilder::new(epg::default_parsers(checker, &settings.logo_base))
        .with_channel_map(channel_map)
        .build(&payloads)?;

    log::info!(
        "Guide has {} channels and {} programmes",
        document.channel_count(),
        document.programme_count()
    );

    epg::write_guide(&settings.output, &epg::render(&document))
}
