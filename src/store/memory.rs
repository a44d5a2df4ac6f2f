use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{Store, StoreError};

/// In-memory implementation of Store for development and testing
///
/// Values are cloned in and out; nothing survives a restart.
/// `fail_next_saves(n)` makes the next `n` saves fail and leave the value as is.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    value: RwLock<Option<T>>,
    failing_saves: AtomicUsize,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            failing_saves: AtomicUsize::new(0),
        }
    }

    /// Creates a store that already holds a value
    pub fn with_value(value: T) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            failing_saves: AtomicUsize::new(0),
        }
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T> Store<T> for InMemoryStore<T>
where
    T: Clone + Send + Sync,
{
    async fn load(&self) -> Result<Option<T>, StoreError> {
        Ok(self.value.read().await.clone())
    }

    async fn save(&self, value: &T) -> Result<(), StoreError> {
        let failing = self
            .failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Io {
                path: "memory".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated failure"),
            });
        }

        *self.value.write().await = Some(value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let store: InMemoryStore<Vec<String>> = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_value() {
        let store = InMemoryStore::with_value(vec!["a".to_string()]);
        store.save(&vec!["b".to_string()]).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(vec!["b".to_string()]));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_value() {
        let store = InMemoryStore::with_value(vec!["a".to_string()]);
        store.fail_next_saves(1);

        assert!(store.save(&vec!["b".to_string()]).await.is_err());
        assert_eq!(store.load().await.unwrap(), Some(vec!["a".to_string()]));

        store.save(&vec!["c".to_string()]).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(vec!["c".to_string()]));
    }
}
