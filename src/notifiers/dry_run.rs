use async_trait::async_trait;

use super::Notifier;
use crate::error::SendError;

/// Writes notifications to the log instead of a chat channel
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), SendError> {
        ::log::info!("[dry-run] notification:\n{}", message);
        Ok(())
    }
}
