//! Feed retrieval over HTTP(S), or from local files in fake-data mode
//! Supports plain and gzip-compressed bodies

use std::io::Read;
use std::thread;
use std::time::Duration;

use flate2::read::GzDecoder;

use crate::error::{GuideError, Result};

/// Placeholder replaced with the current Unix time when a URL is requested
pub const UNIXTIME_PLACEHOLDER: &str = "{unixtime}";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Download configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Maximum attempts per URL
    pub max_retries: u32,
    /// Delay between retries in milliseconds
    pub retry_delay_ms: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds
    pub read_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
            connect_timeout_secs: 30,
            read_timeout_secs: 120,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Reachability check used to validate guessed icon URLs
pub trait UrlChecker: Send + Sync {
    fn is_reachable(&self, url: &str) -> bool;
}

fn create_agent(config: &DownloadConfig) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.read_timeout_secs)))
        .timeout_connect(Some(Duration::from_secs(config.connect_timeout_secs)))
        .max_idle_connections(4)
        .max_idle_connections_per_host(2)
        .build()
        .new_agent()
}

pub struct Fetcher {
    agent: ureq::Agent,
    config: DownloadConfig,
    /// Treat every "URL" as a local file path
    fake_data: bool,
}

impl Fetcher {
    pub fn new(config: DownloadConfig, fake_data: bool) -> Self {
        Self {
            agent: create_agent(&config),
            config,
            fake_data,
        }
    }

    /// Fetch one feed as text
    pub fn fetch(&self, url: &str) -> Result<String> {
        if self.fake_data {
            let bytes = std::fs::read(url).map_err(|e| {
                GuideError::Network(format!("cannot read local feed {}: {}", url, e))
            })?;
            return decode_body(bytes).map_err(|e| GuideError::Network(format!("{}: {}", url, e)));
        }

        let url = substitute_unixtime(url, current_timestamp());
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.try_download(&url) {
                Ok(body) => {
                    log::info!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    if attempts >= self.config.max_retries.max(1) {
                        return Err(GuideError::Network(format!(
                            "{} failed after {} attempts: {}",
                            url, attempts, e
                        )));
                    }
                    log::warn!("Fetching {} failed (attempt {}): {}", url, attempts, e);
                    thread::sleep(Duration::from_millis(self.config.retry_delay_ms));
                }
            }
        }
    }

    fn try_download(&self, url: &str) -> std::result::Result<String, String> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.config.user_agent)
            .call()
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if status != 200 {
            return Err(format!("HTTP error: {}", status));
        }

        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| format!("Read failed: {}", e))?;

        decode_body(bytes)
    }

    /// Fetch every URL on its own thread. Results keep the order of `urls`,
    /// not completion order; the first failure (in that order) is returned.
    pub fn fetch_all(&self, urls: &[String]) -> Result<Vec<String>> {
        thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| scope.spawn(move || self.fetch(url)))
                .collect();

            handles
                .into_iter()
                .zip(urls)
                .map(|(handle, url)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(GuideError::Network(format!("fetch thread for {} panicked", url)))
                    })
                })
                .collect()
        })
    }
}

/// HEAD request, falling back to GET for servers that reject HEAD
pub struct HttpChecker {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpChecker {
    pub fn new(config: &DownloadConfig) -> Self {
        let check_config = DownloadConfig {
            read_timeout_secs: 15,
            connect_timeout_secs: 10,
            ..config.clone()
        };
        Self {
            agent: create_agent(&check_config),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl UrlChecker for HttpChecker {
    fn is_reachable(&self, url: &str) -> bool {
        let head = self
            .agent
            .head(url)
            .header("User-Agent", &self.user_agent)
            .call();
        if matches!(head, Ok(ref r) if r.status().is_success()) {
            return true;
        }

        match self.agent.get(url).header("User-Agent", &self.user_agent).call() {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                log::debug!("Reachability check of {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Replace every `{unixtime}` in `url` with `now`
pub fn substitute_unixtime(url: &str, now: i64) -> String {
    url.replace(UNIXTIME_PLACEHOLDER, &now.to_string())
}

/// Inflate gzip bodies (magic 1f 8b). The text must be valid UTF-8 either way.
fn decode_body(bytes: Vec<u8>) -> std::result::Result<String, String> {
    if bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| format!("gzip decode failed: {}", e))?;
        return Ok(text);
    }
    String::from_utf8(bytes).map_err(|e| format!("body is not valid UTF-8: {}", e))
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
