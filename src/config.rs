//! Configuration management
//!
//! Precedence: command-line flags, then `JSONTV_*` environment variables (both
//! handled by clap), then the optional config file, then built-in defaults.

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::epg::parsers::DEFAULT_LOGO_BASE;
use crate::error::{GuideError, Result};
use crate::fetcher::{DownloadConfig, DEFAULT_USER_AGENT};

pub const DEFAULT_OUTPUT: &str = "./output/guide.xml";

pub const ENV_URLS: &str = "JSONTV_URLS";
pub const ENV_CHANNEL_MAP: &str = "JSONTV_CHANNEL_MAP";
pub const ENV_OUTPUT: &str = "JSONTV_OUTPUT";
pub const ENV_FAKE_DATA: &str = "JSONTV_FAKE_DATA";
pub const ENV_USER_AGENT: &str = "JSONTV_USER_AGENT";
pub const ENV_LOGO_BASE: &str = "JSONTV_LOGO_BASE";
pub const ENV_RETRIES: &str = "JSONTV_RETRIES";

/// Command line / environment settings
#[derive(Parser, Debug, Default)]
#[command(
    name = "jsontv",
    version,
    about = "Converts JSON TV guide feeds into a single XMLTV file"
)]
pub struct Cli {
    /// Feed URL, repeatable or comma-separated. {unixtime} is replaced with the current Unix time
    #[arg(long = "url", env = ENV_URLS, value_delimiter = ',', value_name = "URL")]
    pub urls: Vec<String>,

    /// JSON file mapping channel ids to display names
    #[arg(long, env = ENV_CHANNEL_MAP, value_name = "PATH")]
    pub channel_map: Option<String>,

    /// Output file [default: ./output/guide.xml]
    #[arg(long, env = ENV_OUTPUT, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Treat URLs as local file paths
    #[arg(long, env = ENV_FAKE_DATA, value_parser = clap::builder::BoolishValueParser::new())]
    pub fake_data: bool,

    /// HTTP user agent
    #[arg(long, env = ENV_USER_AGENT, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Logo repository base URL
    #[arg(long, env = ENV_LOGO_BASE, value_name = "URL")]
    pub logo_base: Option<String>,

    /// Fetch attempts per URL [default: 3]
    #[arg(long, env = ENV_RETRIES, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,
}

/// Optional settings file at `<config dir>/jsontv/config.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub channel_map: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub fake_data: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub logo_base: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
}

impl FileConfig {
    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("jsontv");
        path.push("config.json");
        Some(path)
    }

    /// Missing file means defaults; an unreadable one is reported and ignored
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(config) => {
                log::debug!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub urls: Vec<String>,
    pub channel_map: Option<String>,
    pub output: PathBuf,
    pub fake_data: bool,
    pub user_agent: String,
    pub logo_base: String,
    pub retries: u32,
}

/// Treat blank values as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl Settings {
    /// Fill anything the command line and environment left unset from the config file
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Settings> {
        let mut urls = non_empty_list(cli.urls);
        if urls.is_empty() {
            urls = non_empty_list(file.urls);
        }
        if urls.is_empty() {
            return Err(GuideError::Config(format!(
                "no feed URL given (use --url or {})",
                ENV_URLS
            )));
        }

        let retries = match cli.retries.or(file.retries) {
            Some(0) => {
                return Err(GuideError::Config("retry count must be at least 1".to_string()));
            }
            Some(n) => n,
            None => DownloadConfig::default().max_retries,
        };

        Ok(Settings {
            urls,
            channel_map: non_empty(cli.channel_map).or_else(|| non_empty(file.channel_map)),
            output: cli
                .output
                .filter(|p| !p.as_os_str().is_empty())
                .or_else(|| non_empty(file.output).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            fake_data: cli.fake_data || file.fake_data,
            user_agent: non_empty(cli.user_agent)
                .or_else(|| non_empty(file.user_agent))
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            logo_base: non_empty(cli.logo_base)
                .or_else(|| non_empty(file.logo_base))
                .unwrap_or_else(|| DEFAULT_LOGO_BASE.to_string()),
            retries,
        })
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            max_retries: self.retries,
            user_agent: self.user_agent.clone(),
            ..DownloadConfig::default()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
