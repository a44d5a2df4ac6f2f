use serde::{Deserialize, Serialize};

use crate::tracker::{MatchRecord, PlayerMatchStats};

/// One (match, tracked player) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub match_id: String,
    pub player_name: String,
    /// Raw `createdAt` from the API (RFC 3339)
    pub timestamp: String,
    pub map: String,
    pub mode: String,
    /// Display form of the match category, e.g. `NORMAL` or `UNKNOWN (x)`
    pub category: String,
    pub stats: PlayerMatchStats,
}

impl HistoryEntry {
    /// One entry per tracked player in the record
    pub fn flatten(record: &MatchRecord) -> Vec<HistoryEntry> {
        record
            .players
            .iter()
            .map(|(player_name, stats)| HistoryEntry {
                match_id: record.match_id.clone(),
                player_name: player_name.clone(),
                timestamp: record.played_at.clone(),
                map: record.map.clone(),
                mode: record.game_mode.clone(),
                category: record.category.to_string(),
                stats: stats.clone(),
            })
            .collect()
    }
}
