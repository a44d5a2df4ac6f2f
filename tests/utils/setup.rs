use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use matchwatch::{
    history::{HistoryEntry, MatchHistory},
    ledger::PostingLedger,
    publish::InMemoryPublisher,
    roster::{Roster, RosterFileStore},
    scheduler::MatchCycleRunner,
    stats_api::RequestCounter,
    store::{JsonFileStore, Store},
    tracker::MatchTracker,
};

use super::mocks::ScriptedStatsApi;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A cycle runner wired to file-backed stores in a temporary data directory
pub struct TestSetup {
    pub dir: TempDir,
    pub api: Arc<ScriptedStatsApi>,
    pub publisher: Arc<InMemoryPublisher>,
    pub roster: Arc<Roster>,
    pub ledger: Arc<PostingLedger>,
    pub history: Arc<MatchHistory>,
    pub runner: MatchCycleRunner,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { players: vec![] }
    }

    pub fn with_players(mut self, players: &[&str]) -> Self {
        self.players = players.iter().map(|s| s.to_string()).collect();
        self
    }

    pub async fn build(self) -> TestSetup {
        let dir = TempDir::new().unwrap();
        RosterFileStore::new(dir.path().join("players.txt"))
            .save(&self.players)
            .await
            .unwrap();

        TestSetup::start(dir, Arc::new(ScriptedStatsApi::new())).await
    }
}

impl TestSetup {
    /// Wires every component from the files in `dir`, as process startup does
    async fn start(dir: TempDir, api: Arc<ScriptedStatsApi>) -> Self {
        let roster = Arc::new(
            Roster::load(
                Arc::new(RosterFileStore::new(dir.path().join("players.txt"))),
                "steam",
            )
            .await
            .unwrap(),
        );
        let ledger = Arc::new(
            PostingLedger::load(
                Arc::new(JsonFileStore::<Vec<String>>::new(
                    dir.path().join("posted_matches.json"),
                )),
                200,
            )
            .await,
        );
        let history = Arc::new(MatchHistory::new(
            Arc::new(JsonFileStore::<Vec<HistoryEntry>>::new(
                dir.path().join("match_history.json"),
            )),
            1000,
        ));
        let publisher = Arc::new(InMemoryPublisher::new());
        let tracker = MatchTracker::new(api.clone(), RequestCounter::new(), Duration::ZERO);
        let runner = MatchCycleRunner::new(
            tracker,
            roster.clone(),
            ledger.clone(),
            history.clone(),
            publisher.clone(),
            Duration::ZERO,
        );

        Self {
            dir,
            api,
            publisher,
            roster,
            ledger,
            history,
            runner,
        }
    }

    /// Drops all in-memory state and starts again from the persisted files,
    /// keeping the scripted API as it is
    pub async fn restart(self) -> Self {
        let TestSetup { dir, api, .. } = self;
        TestSetup::start(dir, api).await
    }
}
