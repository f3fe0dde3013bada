//! The polling state machine.
//!
//! A [`Watcher`] owns the last observed [`PageSignal`] and runs one cycle at a
//! time: fetch, extract, compare, notify on change, store. It never shares its
//! state; collaborators only see the narrow [`PageFetcher`] and [`Notifier`]
//! capabilities.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{FetchError, SendError};
use crate::fetchers::{Document, PageFetcher};
use crate::notifiers::Notifier;
use crate::signal::PageSignal;


pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// What a single cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Page fetched, signal equal to the stored one
    Unchanged,
    /// Signal changed and the notification was delivered
    Notified,
    /// Signal changed, delivery failed; the new signal is stored anyway
    NotifyFailed,
    /// Page could not be fetched; stored signal untouched
    FetchFailed,
}

impl CycleOutcome {
    /// True when the stored signal was replaced during the cycle
    pub fn changed(&self) -> bool {
        matches!(self, CycleOutcome::Notified | CycleOutcome::NotifyFailed)
    }
}

/// State owned exclusively by one watcher
#[derive(Debug, Clone)]
pub struct WatcherState {
    target: Url,
    last_signal: PageSignal,
}

impl WatcherState {
    pub fn new(target: Url) -> Self {
        Self {
            target,
            last_signal: PageSignal::default(),
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn last_signal(&self) -> &PageSignal {
        &self.last_signal
    }
}

/// Watches one page and notifies when its title or first paragraph changes
pub struct Watcher {
    state: WatcherState,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    fetch_timeout: Duration,
    send_timeout: Duration,
    cycles: u64,
}

impl Watcher {
    /// Create an idle watcher for `target`. Nothing runs until [`Watcher::start`].
    pub fn new(target: Url, fetcher: Arc<dyn PageFetcher>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: WatcherState::new(target),
            fetcher,
            notifier,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            cycles: 0,
        }
    }

    /// Upper bound on a single fetch
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Upper bound on a single notification delivery
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn state(&self) -> &WatcherState {
        &self.state
    }

    pub fn target(&self) -> &Url {
        self.state.target()
    }

    pub fn last_signal(&self) -> &PageSignal {
        self.state.last_signal()
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs one fetch → extract → compare → notify → store cycle.
    ///
    /// Takes `&mut self`, so two cycles on the same watcher can never overlap.
    /// Errors are logged and folded into the returned [`CycleOutcome`].
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.cycles += 1;
        let cycle = self.cycles;
        ::log::debug!("Cycle {} starting for {}", cycle, self.state.target);

        let document = match self.fetch().await {
            Ok(document) => document,
            Err(e) => {
                ::log::error!("Cycle {}: failed to fetch {}: {}", cycle, self.state.target, e);
                return CycleOutcome::FetchFailed;
            }
        };

        let fresh = PageSignal::extract(&document);

        if fresh == self.state.last_signal {
            ::log::debug!("Cycle {}: no change", cycle);
            return CycleOutcome::Unchanged;
        }

        ::log::info!("Cycle {}: change detected, title now {:?}", cycle, fresh.title);

        // Stored regardless of the delivery result
        let outcome = match self.notify(&fresh.to_message()).await {
            Ok(()) => CycleOutcome::Notified,
            Err(e) => {
                ::log::error!("Cycle {}: failed to send notification: {}", cycle, e);
                CycleOutcome::NotifyFailed
            }
        };

        self.state.last_signal = fresh;
        outcome
    }

    async fn fetch(&self) -> Result<Document, FetchError> {
        let target = &self.state.target;
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(target)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: target.to_string(),
                timeout: self.fetch_timeout,
            }),
        }
    }

    async fn notify(&self, message: &str) -> Result<(), SendError> {
        match tokio::time::timeout(self.send_timeout, self.notifier.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout {
                timeout: self.send_timeout,
            }),
        }
    }

    /// Releases the collaborators' connection resources
    pub(crate) async fn close(&self) {
        self.fetcher.close().await;
        self.notifier.close().await;
    }
}
