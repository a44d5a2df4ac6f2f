use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::stats::{LongestKill, WeeklyPlayerAggregate, WeeklySummary};
use crate::tracker::{MatchRecord, PlayerMatchStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Per-match announcements
    Matches,
    /// Weekly best player and leaderboard
    Weekly,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Matches => f.write_str("matches"),
            Destination::Weekly => f.write_str("weekly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundMessage {
    MatchAnnouncement(MatchAnnouncement),
    WeeklyBest(WeeklyBest),
    Leaderboard(Leaderboard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub best_rank: u32,
    pub total_kills: u32,
    pub total_damage: f64,
    pub total_headshots: u32,
    pub headshot_percent: f64,
    pub avg_survival_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    pub name: String,
    pub stats: PlayerMatchStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnnouncement {
    pub match_id: String,
    pub category: String,
    pub game_mode: String,
    pub map: String,
    pub duration_minutes: u64,
    pub played_at: String,
    /// 1-based position within the batch published this cycle
    pub position: usize,
    pub batch_size: usize,
    pub team: TeamSummary,
    /// Best placement first, then most kills, then most damage
    pub players: Vec<PlayerLine>,
}

/// Human-readable map name for an API map id
pub fn map_display_name(map_id: &str) -> String {
    let known = match map_id {
        "Baltic_Main" => "Erangel (Remastered)",
        "Chimera_Main" => "Paramo",
        "Desert_Main" => "Miramar",
        "DihorOtok_Main" => "Vikendi",
        "Erangel_Main" => "Erangel",
        "Heaven_Main" => "Haven",
        "Kiki_Main" => "Deston",
        "Neon_Main" => "Rondo",
        "Range_Main" => "Camp Jackal",
        "Savage_Main" => "Sanhok",
        "Summerland_Main" => "Karakin",
        "Tiger_Main" => "Taego",
        other => return other.trim_end_matches("_Main").to_string(),
    };
    known.to_string()
}

fn player_order(a: &PlayerLine, b: &PlayerLine) -> Ordering {
    a.stats
        .rank
        .cmp(&b.stats.rank)
        .then_with(|| b.stats.kills.cmp(&a.stats.kills))
        .then_with(|| b.stats.damage_dealt.total_cmp(&a.stats.damage_dealt))
        .then_with(|| a.name.cmp(&b.name))
}

impl TeamSummary {
    fn from_players(players: &[PlayerLine]) -> Self {
        let total_kills: u32 = players.iter().map(|p| p.stats.kills).sum();
        let total_headshots: u32 = players.iter().map(|p| p.stats.headshot_kills).sum();
        let total_survival: f64 = players.iter().map(|p| p.stats.survival_time_minutes).sum();

        Self {
            best_rank: players.iter().map(|p| p.stats.rank).min().unwrap_or_default(),
            total_kills,
            total_damage: players.iter().map(|p| p.stats.damage_dealt).sum(),
            total_headshots,
            headshot_percent: if total_kills > 0 {
                f64::from(total_headshots) / f64::from(total_kills) * 100.0
            } else {
                0.0
            },
            avg_survival_minutes: if players.is_empty() {
                0.0
            } else {
                total_survival / players.len() as f64
            },
        }
    }
}

impl MatchAnnouncement {
    pub fn from_record(record: &MatchRecord, position: usize, batch_size: usize) -> Self {
        let mut players: Vec<PlayerLine> = record
            .players
            .iter()
            .map(|(name, stats)| PlayerLine {
                name: name.clone(),
                stats: stats.clone(),
            })
            .collect();
        players.sort_by(player_order);

        Self {
            match_id: record.match_id.clone(),
            category: record.category.to_string(),
            game_mode: record.game_mode.clone(),
            map: map_display_name(&record.map),
            duration_minutes: record.duration_minutes(),
            played_at: record.played_at.clone(),
            position,
            batch_size,
            team: TeamSummary::from_players(&players),
            players,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBest {
    pub lookback_days: i64,
    pub total_matches: usize,
    pub player: WeeklyPlayerAggregate,
    pub top_longest_kills: Vec<LongestKill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub lookback_days: i64,
    pub total_matches: usize,
    pub entries: Vec<WeeklyPlayerAggregate>,
}

impl WeeklyBest {
    pub fn from_summary(summary: &WeeklySummary) -> Option<Self> {
        summary.best().map(|best| Self {
            lookback_days: summary.lookback_days,
            total_matches: summary.total_matches,
            player: best.clone(),
            top_longest_kills: summary.top_longest_kills.clone(),
        })
    }
}

impl Leaderboard {
    pub fn from_summary(summary: &WeeklySummary, size: usize) -> Self {
        Self {
            lookback_days: summary.lookback_days,
            total_matches: summary.total_matches,
            entries: summary.leaderboard(size).to_vec(),
        }
    }
}

/// The weekly best-player message followed by the leaderboard
pub fn weekly_messages(summary: &WeeklySummary, leaderboard_size: usize) -> Vec<OutboundMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(best) = WeeklyBest::from_summary(summary) {
        messages.push(OutboundMessage::WeeklyBest(best));
    }
    messages.push(OutboundMessage::Leaderboard(Leaderboard::from_summary(
        summary,
        leaderboard_size,
    )));
    messages
}
