use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Which collaborator retrieves the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Rendered source through a WebDriver session
    WebDriver,
}

/// Configuration for watching one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Page to monitor
    #[serde(default)]
    pub url: String,

    /// Seconds between cycles
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Destination channel for notifications
    #[serde(default)]
    pub channel_id: String,

    /// Credential for the notification transport
    #[serde(default)]
    pub auth_token: String,

    /// How the page is fetched
    #[serde(default)]
    pub fetcher: FetcherKind,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Upper bound on a single fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound on a single notification, in seconds
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Run the first cycle at startup instead of after one interval
    #[serde(default)]
    pub check_on_start: bool,

    /// `User-Agent` sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the Discord REST API
    #[serde(default = "default_discord_api_base")]
    pub discord_api_base: String,
}

/// Default value for poll_interval_secs
fn default_poll_interval_secs() -> u64 {
    crate::lifecycle::DEFAULT_POLL_INTERVAL.as_secs()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    crate::watcher::DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_send_timeout_secs() -> u64 {
    crate::watcher::DEFAULT_SEND_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    concat!("page-watch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_discord_api_base() -> String {
    crate::notifiers::discord::DEFAULT_API_BASE.to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl WatchConfig {
    /// Create a new configuration with default values
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            poll_interval_secs: default_poll_interval_secs(),
            channel_id: String::new(),
            auth_token: String::new(),
            fetcher: FetcherKind::default(),
            webdriver_url: default_webdriver_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            send_timeout_secs: default_send_timeout_secs(),
            check_on_start: false,
            user_agent: default_user_agent(),
            discord_api_base: default_discord_api_base(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Parses and checks the target URL
    pub fn target(&self) -> Result<Url, ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let url = Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Checks everything needed before the watcher may start.
    ///
    /// Credentials are only required when notifications go to Discord.
    pub fn validate(&self, dry_run: bool) -> Result<Url, ConfigError> {
        let target = self.target()?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let max_secs = crate::lifecycle::MAX_POLL_INTERVAL.as_secs();
        if self.poll_interval_secs > max_secs {
            return Err(ConfigError::IntervalTooLong {
                secs: self.poll_interval_secs,
                max_secs,
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("fetch timeout"));
        }
        if self.send_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("send timeout"));
        }
        if !dry_run {
            if self.channel_id.trim().is_empty() {
                return Err(ConfigError::MissingCredential("channel id"));
            }
            if self.auth_token.trim().is_empty() {
                return Err(ConfigError::MissingCredential("auth token"));
            }
        }
        Ok(target)
    }
}
