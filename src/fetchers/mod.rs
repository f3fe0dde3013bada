pub mod http;
pub mod webdriver;

pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use url::Url;

/// A fetched page, ready for signal extraction
#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    html: String,
}

impl Document {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    /// URL the document was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw page source
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Capability to retrieve the watched page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the document at `url`
    async fn fetch(&self, url: &Url) -> Result<Document, FetchError>;

    /// Release any held connection resources. Called once when the watcher stops.
    async fn close(&self) {}
}
