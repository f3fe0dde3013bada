use std::time::Duration;

use thiserror::Error;

/// Failure to retrieve the watched page. Recoverable: the cycle is skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("fetch of {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("WebDriver error while {context} {url}: {message}")]
    WebDriver {
        context: &'static str,
        url: String,
        message: String,
    },
}

/// Failure to deliver a notification. Recoverable: the new signal is still stored.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification rejected with HTTP status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("notification timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Setup errors. These are fatal and surface before the watcher starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no URL to watch was given")]
    MissingUrl,

    #[error("invalid URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme \"{0}\" (expected http or https)")]
    UnsupportedScheme(String),

    #[error("{0} is required unless running with --dry-run")]
    MissingCredential(&'static str),

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poll interval of {secs}s exceeds the maximum of {max_secs}s")]
    IntervalTooLong { secs: u64, max_secs: u64 },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
