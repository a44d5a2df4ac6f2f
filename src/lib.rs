// Library crate for the match tracker
// This file exposes the public API for the binaries and integration tests

pub mod commands;
pub mod config;
pub mod history;
pub mod ledger;
pub mod publish;
pub mod roster;
pub mod scheduler;
pub mod shared;
pub mod stats;
pub mod stats_api;
pub mod store;
pub mod tracker;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use history::{HistoryEntry, MatchHistory};
pub use ledger::PostingLedger;
pub use publish::{Destination, InMemoryPublisher, OutboundMessage, Publisher, WebhookPublisher};
pub use roster::{Roster, RosterFileStore};
pub use scheduler::{MatchCycleRunner, WeeklyReporter};
pub use shared::{AppError, AppState};
pub use stats::{compute_weekly_best, WeeklyStatsService, WeeklySummary};
pub use stats_api::{ApiError, PubgClient, StatsApi};
pub use store::{InMemoryStore, JsonFileStore, Store, StoreError};
pub use tracker::{MatchRecord, MatchTracker, TrackedPlayer};
