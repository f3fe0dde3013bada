pub mod discord;
pub mod dry_run;

pub use discord::DiscordNotifier;
pub use dry_run::LogNotifier;

use crate::error::SendError;
use async_trait::async_trait;

/// Capability to deliver a change notification to a chat channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an already formatted message
    async fn send(&self, message: &str) -> Result<(), SendError>;

    /// Release any held connection resources. Called once when the watcher stops.
    async fn close(&self) {}
}
