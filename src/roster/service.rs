use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::RosterError;
use crate::store::Store;
use crate::tracker::TrackedPlayer;

fn validate_name(name: &str) -> Result<&str, RosterError> {
    let name = name.trim();
    if name.is_empty() || name.starts_with('#') || name.contains([',', '\n', '\r']) {
        return Err(RosterError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Roster with `name` appended; duplicates are compared ignoring case
pub fn add_player(names: &[String], name: &str) -> Result<Vec<String>, RosterError> {
    let name = validate_name(name)?;
    if let Some(existing) = names.iter().find(|n| n.eq_ignore_ascii_case(name)) {
        return Err(RosterError::AlreadyTracked(existing.clone()));
    }

    let mut updated = names.to_vec();
    updated.push(name.to_string());
    Ok(updated)
}

/// Roster without `name`, plus the stored spelling of the removed entry
pub fn remove_player(names: &[String], name: &str) -> Result<(Vec<String>, String), RosterError> {
    let name = name.trim();
    let index = names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
        .ok_or_else(|| RosterError::NotTracked(name.to_string()))?;

    let mut updated = names.to_vec();
    let removed = updated.remove(index);
    Ok((updated, removed))
}

/// The tracked-player roster.
///
/// Mutations hold the write lock across persistence, so a cycle reading a
/// snapshot sees either the old or the new roster, and a failed save leaves
/// the in-memory roster untouched.
pub struct Roster {
    store: Arc<dyn Store<Vec<String>>>,
    platform: String,
    names: RwLock<Vec<String>>,
}

impl Roster {
    /// Loads the roster, creating an empty file when none exists.
    ///
    /// An unreadable roster starts empty and the file is left as found.
    pub async fn load(
        store: Arc<dyn Store<Vec<String>>>,
        platform: impl Into<String>,
    ) -> Result<Self, RosterError> {
        let names = match store.load().await {
            Ok(Some(names)) => names,
            Ok(None) => {
                warn!("No roster found, creating an empty one");
                store.save(&Vec::new()).await?;
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Could not read roster, starting with no players");
                Vec::new()
            }
        };

        info!(players = names.len(), "Roster loaded");
        Ok(Self {
            store,
            platform: platform.into(),
            names: RwLock::new(names),
        })
    }

    pub async fn snapshot(&self) -> Vec<TrackedPlayer> {
        self.names
            .read()
            .await
            .iter()
            .map(|name| TrackedPlayer::new(name.clone(), self.platform.clone()))
            .collect()
    }

    pub async fn names(&self) -> Vec<String> {
        self.names.read().await.clone()
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    #[instrument(skip(self))]
    pub async fn add(&self, name: &str) -> Result<String, RosterError> {
        let mut names = self.names.write().await;
        let updated = add_player(&names, name)?;
        self.store.save(&updated).await?;

        *names = updated;
        let added = names.last().cloned().unwrap_or_default();
        info!(player = %added, players = names.len(), "Player added to roster");
        Ok(added)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, name: &str) -> Result<String, RosterError> {
        let mut names = self.names.write().await;
        let (updated, removed) = remove_player(&names, name)?;
        self.store.save(&updated).await?;

        *names = updated;
        info!(player = %removed, players = names.len(), "Player removed from roster");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterFileStore;
    use crate::store::{InMemoryStore, StoreError};
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct FailingStore;

    #[async_trait]
    impl Store<Vec<String>> for FailingStore {
        async fn load(&self) -> Result<Option<Vec<String>>, StoreError> {
            Ok(Some(vec!["Alice".to_string()]))
        }

        async fn save(&self, _value: &Vec<String>) -> Result<(), StoreError> {
            Err(StoreError::io(
                std::path::Path::new("players.txt"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    #[test]
    fn test_add_rejects_case_insensitive_duplicate() {
        let result = add_player(&names(&["Alice"]), "alice");
        assert!(matches!(result, Err(RosterError::AlreadyTracked(n)) if n == "Alice"));
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        assert!(matches!(add_player(&[], "  "), Err(RosterError::InvalidName(_))));
        assert!(matches!(add_player(&[], "a,b"), Err(RosterError::InvalidName(_))));
        assert!(matches!(add_player(&[], "#x"), Err(RosterError::InvalidName(_))));
    }

    #[test]
    fn test_remove_returns_stored_spelling() {
        let (updated, removed) = remove_player(&names(&["Alice", "Bob"]), "BOB").unwrap();
        assert_eq!(updated, names(&["Alice"]));
        assert_eq!(removed, "Bob");
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let store = Arc::new(InMemoryStore::with_value(names(&["Alice"])));
        let roster = Roster::load(store.clone(), "steam").await.unwrap();

        roster.add(" Bob ").await.unwrap();
        roster.remove("alice").await.unwrap();

        assert_eq!(roster.names().await, names(&["Bob"]));
        assert_eq!(store.load().await.unwrap(), Some(names(&["Bob"])));
        assert_eq!(
            roster.snapshot().await,
            vec![TrackedPlayer::new("Bob", "steam")]
        );
    }

    #[tokio::test]
    async fn test_missing_roster_is_created_empty() {
        let store = Arc::new(InMemoryStore::<Vec<String>>::new());
        let roster = Roster::load(store.clone(), "steam").await.unwrap();

        assert!(roster.names().await.is_empty());
        assert_eq!(store.load().await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_roster_unchanged() {
        let roster = Roster::load(Arc::new(FailingStore), "steam").await.unwrap();

        assert!(matches!(roster.add("Bob").await, Err(RosterError::Store(_))));
        assert!(matches!(roster.remove("Alice").await, Err(RosterError::Store(_))));
        assert_eq!(roster.names().await, names(&["Alice"]));
    }

    #[tokio::test]
    async fn test_unreadable_roster_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("players.txt");
        std::fs::write(&path, [0x41, 0xff, 0xfe, 0x0a]).unwrap();

        let roster = Roster::load(Arc::new(RosterFileStore::new(path.clone())), "steam")
            .await
            .unwrap();

        assert!(roster.names().await.is_empty());
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x41, 0xff, 0xfe, 0x0a]);
    }
}
