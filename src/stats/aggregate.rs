use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{
    models::{LongestKill, WeeklyPlayerAggregate, WeeklySummary},
    score_weight, EXCLUDED_CATEGORIES, LONGEST_KILL_SLOTS,
};
use crate::history::HistoryEntry;
use crate::tracker::extract::round2;

/// Upper bound on the lookback window; keeps the cutoff arithmetic in range
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn is_excluded(category: &str) -> bool {
    let category = category.to_uppercase();
    EXCLUDED_CATEGORIES
        .iter()
        .any(|excluded| category.contains(excluded))
}

fn played_at(entry: &HistoryEntry) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&entry.timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn accumulate(acc: &mut WeeklyPlayerAggregate, entry: &HistoryEntry) {
    let stats = &entry.stats;

    acc.matches += 1;
    acc.total_kills += stats.kills;
    acc.total_damage += stats.damage_dealt;
    acc.total_survival += stats.survival_time_minutes;
    acc.total_headshots += stats.headshot_kills;
    acc.total_assists += stats.assists;
    acc.total_dbnos += stats.dbnos;
    acc.total_distance += (stats.walk_distance + stats.ride_distance) / 1000.0;

    if stats.rank == 1 {
        acc.wins += 1;
    }
    if stats.rank <= 5 {
        acc.top_5 += 1;
    }
    if stats.rank <= 10 {
        acc.top_10 += 1;
    }

    acc.best_kills = acc.best_kills.max(stats.kills);
    acc.best_damage = acc.best_damage.max(stats.damage_dealt);
    acc.best_survival = acc.best_survival.max(stats.survival_time_minutes);
    acc.longest_kill = acc.longest_kill.max(stats.longest_kill);
}

fn finalize(acc: &mut WeeklyPlayerAggregate) {
    let matches = f64::from(acc.matches.max(1));

    acc.avg_kills = round2(f64::from(acc.total_kills) / matches);
    acc.avg_damage = round2(acc.total_damage / matches);
    acc.avg_survival = round2(acc.total_survival / matches);
    acc.avg_distance = round2(acc.total_distance / matches);
    acc.win_rate = round1(f64::from(acc.wins) / matches * 100.0);
    acc.top_5_rate = round1(f64::from(acc.top_5) / matches * 100.0);

    acc.score = acc.avg_kills * score_weight::AVG_KILLS
        + acc.avg_damage * score_weight::AVG_DAMAGE
        + f64::from(acc.wins) * score_weight::WIN
        + f64::from(acc.top_5) * score_weight::TOP_5
        + f64::from(acc.top_10) * score_weight::TOP_10
        + acc.avg_survival * score_weight::AVG_SURVIVAL
        + f64::from(acc.total_headshots) * score_weight::HEADSHOT;
}

fn by_score_then_name(a: &WeeklyPlayerAggregate, b: &WeeklyPlayerAggregate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.player.cmp(&b.player))
}

/// Best single-match kill distance per player, longest first
fn top_longest_kills(entries: &[&HistoryEntry]) -> Vec<LongestKill> {
    let mut pool: Vec<LongestKill> = entries
        .iter()
        .filter(|e| e.stats.longest_kill > 0.0)
        .map(|e| LongestKill {
            player: e.player_name.clone(),
            distance: e.stats.longest_kill,
        })
        .collect();
    pool.sort_by(|a, b| {
        b.distance
            .total_cmp(&a.distance)
            .then_with(|| a.player.cmp(&b.player))
    });

    let mut top: Vec<LongestKill> = Vec::with_capacity(LONGEST_KILL_SLOTS);
    for kill in pool {
        if top.len() == LONGEST_KILL_SLOTS {
            break;
        }
        if !top.iter().any(|k| k.player == kill.player) {
            top.push(kill);
        }
    }
    top
}

/// Reduces history entries from the last `lookback_days` into ranked
/// per-player aggregates.
///
/// Returns `None` when no entry survives filtering. The result depends only on
/// `entries`, `lookback_days` and `now`.
pub fn compute_weekly_best(
    entries: &[HistoryEntry],
    lookback_days: i64,
    now: DateTime<Utc>,
) -> Option<WeeklySummary> {
    let lookback_days = lookback_days.clamp(0, MAX_LOOKBACK_DAYS);
    let cutoff = now - Duration::days(lookback_days);

    let recent: Vec<&HistoryEntry> = entries
        .iter()
        .filter(|e| !is_excluded(&e.category))
        .filter(|e| played_at(e).is_some_and(|t| t >= cutoff))
        .collect();

    if recent.is_empty() {
        return None;
    }

    let mut players: BTreeMap<&str, WeeklyPlayerAggregate> = BTreeMap::new();
    for entry in &recent {
        let acc = players
            .entry(entry.player_name.as_str())
            .or_insert_with(|| WeeklyPlayerAggregate {
                player: entry.player_name.clone(),
                ..WeeklyPlayerAggregate::default()
            });
        accumulate(acc, entry);
    }

    let mut ranked: Vec<WeeklyPlayerAggregate> = players
        .into_values()
        .map(|mut acc| {
            finalize(&mut acc);
            acc
        })
        .collect();
    ranked.sort_by(by_score_then_name);

    Some(WeeklySummary {
        ranked,
        top_longest_kills: top_longest_kills(&recent),
        lookback_days,
        total_matches: recent.len(),
    })
}
