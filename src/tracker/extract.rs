use std::collections::BTreeMap;

use super::{
    category::determine_category,
    models::{MatchRecord, PlayerMatchStats, UNPLACED_RANK},
};
use crate::stats_api::{MatchResponse, ParticipantStats};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<&ParticipantStats> for PlayerMatchStats {
    fn from(raw: &ParticipantStats) -> Self {
        Self {
            rank: raw.win_place.unwrap_or(UNPLACED_RANK),
            kills: raw.kills,
            damage_dealt: round2(raw.damage_dealt),
            assists: raw.assists,
            dbnos: raw.dbnos,
            headshot_kills: raw.headshot_kills,
            longest_kill: round2(raw.longest_kill),
            revives: raw.revives,
            revives_received: raw.revived_count,
            team_kills: raw.team_kills,
            vehicle_destroys: raw.vehicle_destroys,
            weapons_acquired: raw.weapons_acquired,
            boosts_used: raw.boosts,
            heals_used: raw.heals,
            walk_distance: round2(raw.walk_distance),
            ride_distance: round2(raw.ride_distance),
            swim_distance: round2(raw.swim_distance),
            survival_time_minutes: round2(raw.time_survived / 60.0),
            death_type: raw
                .death_type
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            kill_streaks: raw.kill_streaks,
            road_kills: raw.road_kills,
        }
    }
}

/// Finds a participant by name, ignoring case
pub fn find_participant<'a>(
    response: &'a MatchResponse,
    player_name: &str,
) -> Option<&'a ParticipantStats> {
    response
        .participants()
        .find(|p| p.name.eq_ignore_ascii_case(player_name))
}

/// Builds a record holding stats for every roster name found in the match
pub fn build_match_record(response: &MatchResponse, roster_names: &[String]) -> MatchRecord {
    let attrs = &response.data.attributes;

    let players: BTreeMap<String, PlayerMatchStats> = roster_names
        .iter()
        .filter_map(|name| {
            find_participant(response, name).map(|raw| (name.clone(), PlayerMatchStats::from(raw)))
        })
        .collect();

    MatchRecord {
        match_id: response.data.id.clone(),
        category: determine_category(&attrs.game_mode, &attrs.match_type, attrs.is_custom_match),
        game_mode: attrs.game_mode.clone(),
        match_type: attrs.match_type.clone(),
        map: attrs.map_name.clone(),
        duration_seconds: attrs.duration,
        played_at: attrs.created_at.clone(),
        players,
    }
}
