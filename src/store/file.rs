use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::{Store, StoreError};

/// Pretty-printed JSON file holding a single value.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes `contents` to `path` through a temporary file in the same directory
pub(crate) async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Reads a file, mapping "does not exist" to `None`
pub(crate) async fn read_if_exists(path: &Path) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

#[async_trait]
impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<T>, StoreError> {
        let Some(contents) = read_if_exists(&self.path).await? else {
            debug!("Store file does not exist yet");
            return Ok(None);
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn save(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(value)?;
        write_atomically(&self.path, &json).await?;
        debug!(bytes = json.len(), "Store file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store: JsonFileStore<Vec<String>> = JsonFileStore::new(dir.path().join("ids.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("ids.json"));

        let ids = vec!["m-1".to_string(), "m-2".to_string()];
        store.save(&ids).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(ids));
        assert!(!dir.path().join("nested").join("ids.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.json");
        std::fs::write(&path, "{not json").unwrap();

        let store: JsonFileStore<Vec<String>> = JsonFileStore::new(path);
        let result = store.load().await;

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }
}
