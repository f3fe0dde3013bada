use clap::{Parser, ValueEnum};
use page_watch::{FetcherKind, WatchConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-watch")]
#[command(about = "Watches a web page and posts to Discord when its title or first paragraph changes")]
#[command(version)]
pub struct Args {
    /// Page to watch (overrides the config file)
    pub url: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds between checks
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Discord channel to notify
    #[arg(long, env = "PAGE_WATCH_CHANNEL")]
    pub channel: Option<String>,

    /// Discord bot token
    #[arg(long, env = "PAGE_WATCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// How to fetch the page
    #[arg(short, long, value_enum)]
    pub fetcher: Option<FetcherArg>,

    /// WebDriver server used with --fetcher webdriver
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Check once at startup instead of waiting one interval
    #[arg(long)]
    pub check_on_start: bool,

    /// Log notifications instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FetcherArg {
    Http,
    Webdriver,
}

impl From<FetcherArg> for FetcherKind {
    fn from(arg: FetcherArg) -> Self {
        match arg {
            FetcherArg::Http => FetcherKind::Http,
            FetcherArg::Webdriver => FetcherKind::WebDriver,
        }
    }
}

impl Args {
    /// Applies command-line overrides on top of a loaded (or default) configuration
    pub fn apply(&self, mut config: WatchConfig) -> WatchConfig {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(interval) = self.interval {
            config.poll_interval_secs = interval;
        }
        if let Some(channel) = &self.channel {
            config.channel_id = channel.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = token.clone();
        }
        if let Some(fetcher) = self.fetcher {
            config.fetcher = fetcher.into();
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url.clone();
            }
        }
        if self.check_on_start {
            config.check_on_start = true;
        }
        config
    }
}
