use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::{
    extract::build_match_record,
    models::{MatchRecord, TrackedPlayer},
};
use crate::stats_api::{client::short_id, ApiError, RequestCounter, StatsApi};

/// Per-cycle bookkeeping, replaced at the start of every cycle
#[derive(Debug, Clone)]
pub struct CycleState {
    pub number: u64,
    pub started_at: DateTime<Utc>,
    started: Instant,
    /// Match ids already claimed by some player's lookup this cycle
    pub resolved_this_cycle: HashSet<String>,
}

impl CycleState {
    fn new(number: u64) -> Self {
        Self {
            number,
            started_at: Utc::now(),
            started: Instant::now(),
            resolved_this_cycle: HashSet::new(),
        }
    }
}

/// Outcome of one cycle, used for the summary log and by the scheduler
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub started_at: DateTime<Utc>,
    pub requests_issued: u64,
    pub elapsed: Duration,
    pub matches: Vec<MatchRecord>,
}

/// Outcome of looking at one player's latest match
#[derive(Debug, PartialEq)]
enum Lookup {
    Skipped,
    SharedThisCycle,
    Unchanged,
    New(String),
}

/// Polls every tracked player once per cycle and returns genuinely new matches.
///
/// Players are processed strictly one after another with `request_delay`
/// between them, because every lookup draws on the same API quota.
pub struct MatchTracker {
    api: Arc<dyn StatsApi>,
    counter: RequestCounter,
    request_delay: Duration,
    /// Player name -> last match id seen, kept across cycles (memory only)
    last_seen: HashMap<String, String>,
    cycle: CycleState,
}

impl MatchTracker {
    pub fn new(api: Arc<dyn StatsApi>, counter: RequestCounter, request_delay: Duration) -> Self {
        Self {
            api,
            counter,
            request_delay,
            last_seen: HashMap::new(),
            cycle: CycleState::new(0),
        }
    }

    pub fn cycle(&self) -> &CycleState {
        &self.cycle
    }

    pub fn last_seen(&self, player_name: &str) -> Option<&str> {
        self.last_seen.get(player_name).map(String::as_str)
    }

    fn reset_cycle(&mut self) {
        self.cycle = CycleState::new(self.cycle.number + 1);
        self.counter.reset();
        debug!(cycle = self.cycle.number, "Tracker cycle reset");
    }

    /// Runs one full cycle over `players`
    #[instrument(skip(self, players), fields(players = players.len()))]
    pub async fn poll_cycle(&mut self, players: &[TrackedPlayer]) -> CycleReport {
        self.reset_cycle();
        info!(cycle = self.cycle.number, "Starting match cycle");

        let roster_names: Vec<String> = players.iter().map(|p| p.name.clone()).collect();
        let mut matches = Vec::new();

        for (index, player) in players.iter().enumerate() {
            info!(
                cycle = self.cycle.number,
                player = %player.name,
                position = index + 1,
                total = players.len(),
                "Checking player"
            );

            if let Some(record) = self.check_player(player, &roster_names).await {
                info!(
                    match_id = %short_id(&record.match_id),
                    players = record.players.len(),
                    total_new = matches.len() + 1,
                    "Match data saved"
                );
                matches.push(record);
            }

            if index + 1 < players.len() {
                sleep(self.request_delay).await;
            }
        }

        let report = CycleReport {
            cycle_number: self.cycle.number,
            started_at: self.cycle.started_at,
            requests_issued: self.counter.get(),
            elapsed: self.cycle.started.elapsed(),
            matches,
        };
        log_cycle_summary(&report);
        report
    }

    async fn check_player(
        &mut self,
        player: &TrackedPlayer,
        roster_names: &[String],
    ) -> Option<MatchRecord> {
        let match_id = match self.lookup(player).await {
            Lookup::New(match_id) => match_id,
            _ => return None,
        };

        let previous = self.last_seen.insert(player.name.clone(), match_id.clone());
        self.cycle.resolved_this_cycle.insert(match_id.clone());

        sleep(self.request_delay).await;

        let response = match self.api.fetch_match_detail(&match_id, &player.platform).await {
            Ok(response) => response,
            Err(e) if !e.is_retryable() => {
                warn!(
                    player = %player.name,
                    match_id = %short_id(&match_id),
                    error = %e,
                    "Match detail unavailable, skipping this match"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    player = %player.name,
                    match_id = %short_id(&match_id),
                    error = %e,
                    "Could not fetch match detail, will retry later"
                );
                // Release the match so a later lookup can fetch it again
                self.cycle.resolved_this_cycle.remove(&match_id);
                match previous {
                    Some(previous) => self.last_seen.insert(player.name.clone(), previous),
                    None => self.last_seen.remove(&player.name),
                };
                return None;
            }
        };

        let record = build_match_record(&response, roster_names);
        if !record.is_publishable() {
            warn!(
                match_id = %short_id(&match_id),
                "Match has no tracked participants, discarding"
            );
            return None;
        }

        Some(record)
    }

    async fn lookup(&mut self, player: &TrackedPlayer) -> Lookup {
        let match_id = match self
            .api
            .resolve_latest_match_id(&player.name, &player.platform)
            .await
        {
            Ok(match_id) => match_id,
            Err(e) => {
                log_lookup_failure(player, &e);
                return Lookup::Skipped;
            }
        };

        if self.cycle.resolved_this_cycle.contains(&match_id) {
            info!(
                player = %player.name,
                match_id = %short_id(&match_id),
                "Match already processed this cycle (shared with another tracked player)"
            );
            self.last_seen.insert(player.name.clone(), match_id);
            return Lookup::SharedThisCycle;
        }

        if self.last_seen.get(&player.name) == Some(&match_id) {
            info!(
                player = %player.name,
                match_id = %short_id(&match_id),
                "Same match as last cycle, skipping"
            );
            return Lookup::Unchanged;
        }

        info!(player = %player.name, match_id = %short_id(&match_id), "New match found");
        Lookup::New(match_id)
    }
}

fn log_lookup_failure(player: &TrackedPlayer, error: &ApiError) {
    if error.is_expected() {
        info!(player = %player.name, platform = %player.platform, reason = %error, "Skipping player this cycle");
    } else {
        warn!(player = %player.name, platform = %player.platform, error = %error, "Player lookup failed, skipping this cycle");
    }
}

fn log_cycle_summary(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        new_matches = report.matches.len(),
        api_requests = report.requests_issued,
        elapsed_secs = report.elapsed.as_secs(),
        "Cycle summary"
    );

    for (index, record) in report.matches.iter().enumerate() {
        let players: Vec<&str> = record.players.keys().map(String::as_str).collect();
        info!(
            position = index + 1,
            players = %players.join(", "),
            best_rank = ?record.best_rank(),
            total_kills = record.total_kills(),
            "New match"
        );
    }

    if report.matches.is_empty() {
        info!(cycle = report.cycle_number, "No new matches found this cycle");
    }
}
