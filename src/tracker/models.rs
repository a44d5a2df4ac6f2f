use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placement recorded when the source omits one; never a win or a top-10
pub const UNPLACED_RANK: u32 = 99;

/// A player on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    pub name: String,
    pub platform: String,
}

impl TrackedPlayer {
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
        }
    }
}

/// Classification of a match, derived from mode and match type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchCategory {
    Custom,
    Ranked,
    Casual,
    Normal,
    Arcade,
    /// Carries the raw game mode for diagnostics
    Unknown(String),
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchCategory::Custom => f.write_str("CUSTOM"),
            MatchCategory::Ranked => f.write_str("RANKED"),
            MatchCategory::Casual => f.write_str("CASUAL"),
            MatchCategory::Normal => f.write_str("NORMAL"),
            MatchCategory::Arcade => f.write_str("ARCADE"),
            MatchCategory::Unknown(mode) => write!(f, "UNKNOWN ({mode})"),
        }
    }
}

/// Stats for one player in one match. Absent source fields become zero,
/// `"N/A"` or [`UNPLACED_RANK`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerMatchStats {
    pub rank: u32,
    pub kills: u32,
    pub damage_dealt: f64,
    pub assists: u32,
    pub dbnos: u32,
    pub headshot_kills: u32,
    pub longest_kill: f64,
    pub revives: u32,
    pub revives_received: u32,
    pub team_kills: u32,
    pub vehicle_destroys: u32,
    pub weapons_acquired: u32,
    pub boosts_used: u32,
    pub heals_used: u32,
    pub walk_distance: f64,
    pub ride_distance: f64,
    pub swim_distance: f64,
    pub survival_time_minutes: f64,
    pub death_type: String,
    pub kill_streaks: u32,
    pub road_kills: u32,
}

impl Default for PlayerMatchStats {
    fn default() -> Self {
        Self {
            rank: UNPLACED_RANK,
            kills: 0,
            damage_dealt: 0.0,
            assists: 0,
            dbnos: 0,
            headshot_kills: 0,
            longest_kill: 0.0,
            revives: 0,
            revives_received: 0,
            team_kills: 0,
            vehicle_destroys: 0,
            weapons_acquired: 0,
            boosts_used: 0,
            heals_used: 0,
            walk_distance: 0.0,
            ride_distance: 0.0,
            swim_distance: 0.0,
            survival_time_minutes: 0.0,
            death_type: "N/A".to_string(),
            kill_streaks: 0,
            road_kills: 0,
        }
    }
}

/// One newly discovered match with stats for every tracked participant
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub match_id: String,
    pub category: MatchCategory,
    pub game_mode: String,
    pub match_type: String,
    pub map: String,
    pub duration_seconds: u64,
    pub played_at: String,
    /// Keyed by roster name
    pub players: BTreeMap<String, PlayerMatchStats>,
}

impl MatchRecord {
    /// Records without any tracked participant must never be published
    pub fn is_publishable(&self) -> bool {
        !self.players.is_empty()
    }

    pub fn duration_minutes(&self) -> u64 {
        self.duration_seconds / 60
    }

    pub fn best_rank(&self) -> Option<u32> {
        self.players.values().map(|s| s.rank).min()
    }

    pub fn total_kills(&self) -> u32 {
        self.players.values().map(|s| s.kills).sum()
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.players.keys().map(String::as_str).collect();
        write!(f, "{} [{}] {}", self.match_id, self.category, names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(MatchCategory::Normal.to_string(), "NORMAL");
        assert_eq!(MatchCategory::Custom.to_string(), "CUSTOM");
        assert_eq!(
            MatchCategory::Unknown("tdm-x".to_string()).to_string(),
            "UNKNOWN (tdm-x)"
        );
    }

    #[test]
    fn test_stats_deserialize_with_missing_fields() {
        let stats: PlayerMatchStats = serde_json::from_str(r#"{"kills": 3}"#).unwrap();

        assert_eq!(stats.kills, 3);
        assert_eq!(stats.rank, UNPLACED_RANK);
        assert_eq!(stats.death_type, "N/A");
        assert_eq!(stats.damage_dealt, 0.0);
    }

    #[test]
    fn test_empty_record_is_not_publishable() {
        let record = MatchRecord {
            match_id: "m-1".to_string(),
            category: MatchCategory::Normal,
            game_mode: "squad".to_string(),
            match_type: "official".to_string(),
            map: "Erangel_Main".to_string(),
            duration_seconds: 1810,
            played_at: "2026-10-12T18:00:00Z".to_string(),
            players: BTreeMap::new(),
        };

        assert!(!record.is_publishable());
        assert_eq!(record.duration_minutes(), 30);
        assert_eq!(record.best_rank(), None);
    }
}
