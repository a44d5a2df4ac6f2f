//! Remote stats API client.
//!
//! Wraps the PUBG JSON:API endpoints behind [`StatsApi`] so the tracker can be
//! driven by a scripted fake in tests.

pub mod client;
mod errors;
pub mod models;
pub mod retry;

pub use client::PubgClient;
pub use errors::ApiError;
pub use models::{MatchResponse, ParticipantStats, PlayersResponse};
pub use retry::{RequestCounter, RetryPolicy};

use async_trait::async_trait;

#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Resolves the id of the player's most recent match
    async fn resolve_latest_match_id(
        &self,
        player_name: &str,
        platform: &str,
    ) -> Result<String, ApiError>;

    async fn fetch_match_detail(
        &self,
        match_id: &str,
        platform: &str,
    ) -> Result<MatchResponse, ApiError>;
}
