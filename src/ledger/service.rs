use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::store::{Store, StoreError};

pub const DEFAULT_RETENTION: usize = 200;

#[derive(Debug, Default)]
struct LedgerState {
    /// Insertion order, oldest first
    order: Vec<String>,
    ids: HashSet<String>,
}

impl LedgerState {
    fn from_ids(ids: Vec<String>) -> Self {
        let mut state = Self::default();
        for id in ids {
            state.insert(id);
        }
        state
    }

    fn insert(&mut self, id: String) -> bool {
        if self.ids.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    fn truncate_to(&mut self, retention: usize) {
        if self.order.len() > retention {
            let excess = self.order.len() - retention;
            let evicted: Vec<String> = self.order.drain(..excess).collect();
            for id in &evicted {
                self.ids.remove(id);
            }
        }
    }
}

/// Bounded, persisted set of published match ids.
///
/// Each mark holds the lock across mutate and save, so concurrent markers
/// never interleave a read with a write.
pub struct PostingLedger {
    store: Arc<dyn Store<Vec<String>>>,
    retention: usize,
    state: Mutex<LedgerState>,
}

impl PostingLedger {
    /// Loads the ledger; a missing or unreadable file starts it empty
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn Store<Vec<String>>>, retention: usize) -> Self {
        let ids = match store.load().await {
            Ok(Some(ids)) => {
                info!(count = ids.len(), "Loaded previously posted matches");
                ids
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not load posted matches, starting empty");
                Vec::new()
            }
        };

        let mut state = LedgerState::from_ids(ids);
        state.truncate_to(retention.max(1));

        Self {
            store,
            retention: retention.max(1),
            state: Mutex::new(state),
        }
    }

    pub async fn is_posted(&self, match_id: &str) -> bool {
        self.state.lock().await.ids.contains(match_id)
    }

    /// Adds ids in the given order, evicts the oldest past retention, persists.
    pub async fn mark_posted<I>(&self, match_ids: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = String> + Send,
        I::IntoIter: Send,
    {
        let mut state = self.state.lock().await;
        let mut added = 0;
        for id in match_ids {
            if state.insert(id) {
                added += 1;
            }
        }
        state.truncate_to(self.retention);

        self.store.save(&state.order).await?;
        info!(added, stored = state.order.len(), retention = self.retention, "Saved posted match ids");
        Ok(())
    }

    /// Ids currently held, oldest first
    pub async fn posted_ids(&self) -> Vec<String> {
        self.state.lock().await.order.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.order.len()
    }
}
