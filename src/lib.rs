// Re-export modules
pub mod config;
pub mod error;
pub mod fetchers;
pub mod lifecycle;
pub mod notifiers;
pub mod parsers;
pub mod signal;
pub mod watcher;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::{FetcherKind, WatchConfig};
pub use error::{ConfigError, FetchError, SendError};
pub use lifecycle::{FirstCycle, Phase, WatcherHandle};
pub use signal::PageSignal;
pub use watcher::{CycleOutcome, Watcher};

use fetchers::{HttpFetcher, PageFetcher, WebDriverFetcher};
use notifiers::{DiscordNotifier, LogNotifier, Notifier};
use std::sync::Arc;

/// Builds an idle watcher and its collaborators from a configuration.
///
/// With `dry_run` set, notifications are written to the log instead of
/// Discord and no credentials are needed.
///
/// # Errors
///
/// Any [`ConfigError`] here is a setup failure; the watcher never starts.
pub fn build_watcher(config: &WatchConfig, dry_run: bool) -> Result<Watcher, ConfigError> {
    let target = config.validate(dry_run)?;

    let fetcher: Arc<dyn PageFetcher> = match config.fetcher {
        FetcherKind::Http => Arc::new(HttpFetcher::new(
            config.fetch_timeout(),
            &config.user_agent,
        )?),
        FetcherKind::WebDriver => {
            ::log::info!(
                "Fetching through WebDriver at {} (a WebDriver server such as ChromeDriver must be running)",
                config.webdriver_url
            );
            Arc::new(WebDriverFetcher::new(&config.webdriver_url))
        }
    };

    let notifier: Arc<dyn Notifier> = if dry_run {
        ::log::info!("Dry run: notifications will be logged, not sent");
        Arc::new(LogNotifier)
    } else {
        Arc::new(DiscordNotifier::new(
            &config.discord_api_base,
            &config.channel_id,
            &config.auth_token,
            config.send_timeout(),
            &config.user_agent,
        )?)
    };

    Ok(Watcher::new(target, fetcher, notifier)
        .with_fetch_timeout(config.fetch_timeout())
        .with_send_timeout(config.send_timeout()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_watcher_dry_run() {
        let config = WatchConfig::new("https://example.com/news");
        let watcher = build_watcher(&config, true).expect("dry run needs no credentials");

        assert_eq!(watcher.target().as_str(), "https://example.com/news");
        assert!(watcher.last_signal().is_empty());
        assert_eq!(watcher.phase(), Phase::Idle);
    }

    #[test]
    fn test_build_watcher_requires_credentials() {
        let config = WatchConfig::new("https://example.com/news");
        assert!(matches!(
            build_watcher(&config, false),
            Err(ConfigError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_build_watcher_webdriver_does_not_connect_eagerly() {
        let mut config = WatchConfig::new("https://example.com/news");
        config.fetcher = FetcherKind::WebDriver;
        config.webdriver_url = "http://127.0.0.1:1".to_string();
        config.channel_id = "42".to_string();
        config.auth_token = "abc".to_string();

        assert!(build_watcher(&config, false).is_ok());
    }
}
