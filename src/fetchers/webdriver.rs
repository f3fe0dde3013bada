//! WebDriver-backed fetcher for pages that render their content with JavaScript.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use tokio::sync::Mutex;
use url::Url;

use super::{Document, PageFetcher};
use crate::error::FetchError;

/// Well-known local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Fetches pages through a WebDriver session.
///
/// The session is opened lazily on the first fetch and kept for later cycles.
/// A lost session is reconnected once before the fetch is reported as failed.
pub struct WebDriverFetcher {
    webdriver_url: String,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            client: Mutex::new(None),
        }
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    async fn navigate(client: &Client, url: &Url) -> Result<String, (bool, FetchError)> {
        if let Err(e) = client.goto(url.as_str()).await {
            return Err(navigation_error(e, "accessing", url));
        }
        client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", url))
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &Url) -> Result<Document, FetchError> {
        let mut guard = self.client.lock().await;

        for attempt in 0..2 {
            if guard.is_none() || attempt > 0 {
                ::log::debug!("Connecting to WebDriver for {}", url);
                *guard = Some(connect_to_webdriver(&self.webdriver_url).await.ok_or_else(
                    || FetchError::WebDriver {
                        context: "connecting for",
                        url: url.to_string(),
                        message: "no WebDriver server reachable".to_string(),
                    },
                )?);
            }

            let Some(client) = guard.as_ref() else {
                continue;
            };

            match Self::navigate(client, url).await {
                Ok(html) => {
                    ::log::debug!("Fetched {} bytes from {} via WebDriver", html.len(), url);
                    return Ok(Document::new(url.clone(), html));
                }
                Err((session_lost, err)) if session_lost && attempt == 0 => {
                    ::log::warn!("WebDriver session lost, reconnecting: {}", err);
                }
                Err((_, err)) => return Err(err),
            }
        }

        Err(FetchError::WebDriver {
            context: "reconnecting for",
            url: url.to_string(),
            message: "session could not be re-established".to_string(),
        })
    }

    async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            } else {
                ::log::debug!("Closed WebDriver session");
            }
        }
    }
}

/// Connects to the WebDriver instance, falling back to well-known local endpoints
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        // Fallback failures stay quiet to avoid log spam
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or pass --webdriver-url"
    );
    None
}

/// Maps a WebDriver command error, flagging whether the session itself was lost
fn navigation_error(
    error: fantoccini::error::CmdError,
    context: &'static str,
    url: &Url,
) -> (bool, FetchError) {
    let message = error.to_string();
    let session_lost = message.contains("Unable to find session")
        || message.contains("invalid session id");

    (
        session_lost,
        FetchError::WebDriver {
            context,
            url: url.to_string(),
            message,
        },
    )
}
