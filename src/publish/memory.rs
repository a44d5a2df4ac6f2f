use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::{Destination, OutboundMessage, PublishError, Publisher};

/// Keeps published messages in memory.
///
/// `fail_next(n)` makes the next `n` publishes fail without recording.
#[derive(Default)]
pub struct InMemoryPublisher {
    sent: Mutex<Vec<(Destination, OutboundMessage)>>,
    failures_left: AtomicUsize,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<(Destination, OutboundMessage)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, destination: Destination) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(d, _)| *d == destination)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl Publisher for InMemoryPublisher {
    async fn publish(
        &self,
        destination: Destination,
        message: &OutboundMessage,
    ) -> Result<(), PublishError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PublishError::Unavailable("simulated failure".to_string()));
        }

        self.sent.lock().await.push((destination, message.clone()));
        Ok(())
    }
}
