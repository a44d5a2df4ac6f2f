//! Flattened per-player match history, the input to weekly aggregation.

pub mod models;
pub mod repository;

pub use models::HistoryEntry;
pub use repository::MatchHistory;
