use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::store::{
    file::{read_if_exists, write_atomically},
    Store, StoreError,
};

const HEADER: &str = "\
# Players to track
# Format: PlayerName (one per line; lines starting with # are ignored)
";

/// Plain-text roster file, one player name per line.
///
/// Legacy `name,platform` lines are accepted; the platform part is ignored
/// because every player is tracked on the configured platform.
#[derive(Debug, Clone)]
pub struct RosterFileStore {
    path: PathBuf,
}

impl RosterFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn parse_roster(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.split(',').next().unwrap_or(line).trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

pub fn render_roster(names: &[String]) -> String {
    let mut out = String::from(HEADER);
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

#[async_trait]
impl Store<Vec<String>> for RosterFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Vec<String>>, StoreError> {
        let Some(contents) = read_if_exists(&self.path).await? else {
            debug!("Roster file does not exist yet");
            return Ok(None);
        };
        Ok(Some(parse_roster(&contents)))
    }

    #[instrument(skip(self, names), fields(path = %self.path.display(), players = names.len()))]
    async fn save(&self, names: &Vec<String>) -> Result<(), StoreError> {
        write_atomically(&self.path, render_roster(names).as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_legacy_platform() {
        let contents = "# header\n\nAlice\n  Bob , xbox \n#Carol\n,steam\nDave\n";
        assert_eq!(parse_roster(contents), vec!["Alice", "Bob", "Dave"]);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = RosterFileStore::new(dir.path().join("players.txt"));
        let names = vec!["Alice".to_string(), "Bob".to_string()];

        store.save(&names).await.unwrap();
        let written = std::fs::read_to_string(store.path()).unwrap();

        assert!(written.starts_with("# Players to track"));
        assert_eq!(store.load().await.unwrap(), Some(names));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = RosterFileStore::new(dir.path().join("players.txt"));
        assert!(store.load().await.unwrap().is_none());
    }
}
