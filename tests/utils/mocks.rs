use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use matchwatch::stats_api::{ApiError, MatchResponse, StatsApi};

// ============================================================================
// Scripted Stats API
// ============================================================================

/// A participant line for a scripted match: (name, placement, kills, damage)
pub type Participant<'a> = (&'a str, u32, u32, f64);

/// Stats API double whose latest-match answers and match bodies are set by
/// the test. Unknown players resolve to `PlayerNotFound`.
#[derive(Default)]
pub struct ScriptedStatsApi {
    latest: Mutex<HashMap<String, String>>,
    matches: Mutex<HashMap<String, MatchResponse>>,
    failing_details: Mutex<HashSet<String>>,
    detail_calls: Mutex<Vec<String>>,
}

impl ScriptedStatsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_latest(&self, player: &str, match_id: &str) {
        self.latest
            .lock()
            .await
            .insert(player.to_lowercase(), match_id.to_string());
    }

    pub async fn add_match(&self, match_id: &str, game_mode: &str, participants: &[Participant<'_>]) {
        let included: Vec<_> = participants
            .iter()
            .enumerate()
            .map(|(i, (name, rank, kills, damage))| {
                json!({
                    "type": "participant",
                    "id": format!("p-{i}"),
                    "attributes": { "stats": {
                        "name": name,
                        "winPlace": rank,
                        "kills": kills,
                        "damageDealt": damage,
                        "timeSurvived": 1200,
                        "longestKill": 50.0 + f64::from(*kills) * 10.0
                    }}
                })
            })
            .collect();

        let response: MatchResponse = serde_json::from_value(json!({
            "data": {
                "type": "match",
                "id": match_id,
                "attributes": {
                    "gameMode": game_mode,
                    "matchType": "official",
                    "isCustomMatch": false,
                    "mapName": "Erangel_Main",
                    "duration": 1800,
                    "createdAt": chrono::Utc::now().to_rfc3339()
                }
            },
            "included": included
        }))
        .unwrap();

        self.matches
            .lock()
            .await
            .insert(match_id.to_string(), response);
    }

    /// The next detail fetch for `match_id` fails as if retries ran out
    pub async fn fail_detail_once(&self, match_id: &str) {
        self.failing_details
            .lock()
            .await
            .insert(match_id.to_string());
    }

    pub async fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().await.clone()
    }
}

#[async_trait]
impl StatsApi for ScriptedStatsApi {
    async fn resolve_latest_match_id(
        &self,
        player_name: &str,
        _platform: &str,
    ) -> Result<String, ApiError> {
        self.latest
            .lock()
            .await
            .get(&player_name.to_lowercase())
            .cloned()
            .ok_or_else(|| ApiError::PlayerNotFound(player_name.to_string()))
    }

    async fn fetch_match_detail(
        &self,
        match_id: &str,
        _platform: &str,
    ) -> Result<MatchResponse, ApiError> {
        self.detail_calls.lock().await.push(match_id.to_string());

        if self.failing_details.lock().await.remove(match_id) {
            return Err(ApiError::RetriesExhausted {
                context: format!("match {match_id}"),
                attempts: 3,
                last_error: "HTTP 503 Service Unavailable".to_string(),
            });
        }

        self.matches
            .lock()
            .await
            .get(match_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("match {match_id}")))
    }
}
