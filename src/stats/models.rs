use serde::Serialize;

/// One player's figures over the lookback window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyPlayerAggregate {
    pub player: String,
    pub matches: u32,

    pub total_kills: u32,
    pub total_damage: f64,
    /// Minutes
    pub total_survival: f64,
    pub total_headshots: u32,
    pub total_assists: u32,
    pub total_dbnos: u32,
    /// Walk plus ride distance, in kilometres
    pub total_distance: f64,

    pub wins: u32,
    pub top_5: u32,
    pub top_10: u32,

    pub best_kills: u32,
    pub best_damage: f64,
    pub best_survival: f64,
    pub longest_kill: f64,

    pub avg_kills: f64,
    pub avg_damage: f64,
    pub avg_survival: f64,
    pub avg_distance: f64,
    /// Percentages
    pub win_rate: f64,
    pub top_5_rate: f64,

    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestKill {
    pub player: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// Every player in the window, highest score first
    pub ranked: Vec<WeeklyPlayerAggregate>,
    pub top_longest_kills: Vec<LongestKill>,
    pub lookback_days: i64,
    pub total_matches: usize,
}

impl WeeklySummary {
    pub fn best(&self) -> Option<&WeeklyPlayerAggregate> {
        self.ranked.first()
    }

    pub fn leaderboard(&self, size: usize) -> &[WeeklyPlayerAggregate] {
        &self.ranked[..size.min(self.ranked.len())]
    }

    /// 1-based position of a player, ignoring case
    pub fn standing(&self, player: &str) -> Option<(usize, &WeeklyPlayerAggregate)> {
        self.ranked
            .iter()
            .enumerate()
            .find(|(_, p)| p.player.eq_ignore_ascii_case(player))
            .map(|(index, p)| (index + 1, p))
    }
}
