use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::models::HistoryEntry;
use crate::store::{Store, StoreError};

pub const DEFAULT_RETENTION: usize = 1000;

/// Append-only history, truncated from the front past `retention` entries.
///
/// The mutex spans load, append and save so concurrent appends cannot lose
/// each other's entries.
pub struct MatchHistory {
    store: Arc<dyn Store<Vec<HistoryEntry>>>,
    retention: usize,
    lock: Mutex<()>,
}

impl MatchHistory {
    pub fn new(store: Arc<dyn Store<Vec<HistoryEntry>>>, retention: usize) -> Self {
        Self {
            store,
            retention: retention.max(1),
            lock: Mutex::new(()),
        }
    }

    async fn load_unlocked(&self) -> Vec<HistoryEntry> {
        match self.store.load().await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not load match history, treating as empty");
                Vec::new()
            }
        }
    }

    /// All entries, oldest first
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock().await;
        self.load_unlocked().await
    }

    #[instrument(skip(self, entries), fields(new_entries = entries.len()))]
    pub async fn append(&self, entries: Vec<HistoryEntry>) -> Result<usize, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock.lock().await;
        let mut history = self.load_unlocked().await;
        history.extend(entries);

        if history.len() > self.retention {
            let excess = history.len() - self.retention;
            history.drain(..excess);
        }

        self.store.save(&history).await?;
        info!(stored = history.len(), retention = self.retention, "Saved match history");
        Ok(history.len())
    }
}
