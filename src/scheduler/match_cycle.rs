use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use super::CycleError;
use crate::history::{HistoryEntry, MatchHistory};
use crate::ledger::PostingLedger;
use crate::publish::{Destination, MatchAnnouncement, OutboundMessage, Publisher};
use crate::roster::Roster;
use crate::stats_api::client::short_id;
use crate::tracker::{MatchRecord, MatchTracker};

/// Records whose publish failed are retried on later cycles, up to this many
const MAX_PENDING: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutcome {
    pub cycle_number: u64,
    /// Ids published this cycle, in publish order
    pub published: Vec<String>,
    pub already_posted: usize,
    pub failed: usize,
}

/// Runs one tracker cycle and publishes what it finds.
///
/// A match is marked posted only after the channel accepted it. Failed
/// publishes stay pending and are offered again on the next cycle. History
/// entries that could not be saved are kept and written with the next batch.
pub struct MatchCycleRunner {
    tracker: MatchTracker,
    roster: Arc<Roster>,
    ledger: Arc<PostingLedger>,
    history: Arc<MatchHistory>,
    publisher: Arc<dyn Publisher>,
    post_delay: Duration,
    pending: Vec<MatchRecord>,
    unrecorded: Vec<HistoryEntry>,
}

impl MatchCycleRunner {
    pub fn new(
        tracker: MatchTracker,
        roster: Arc<Roster>,
        ledger: Arc<PostingLedger>,
        history: Arc<MatchHistory>,
        publisher: Arc<dyn Publisher>,
        post_delay: Duration,
    ) -> Self {
        Self {
            tracker,
            roster,
            ledger,
            history,
            publisher,
            post_delay,
            pending: Vec::new(),
            unrecorded: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[MatchRecord] {
        &self.pending
    }

    /// History entries of published matches still waiting to be saved
    pub fn unrecorded(&self) -> &[HistoryEntry] {
        &self.unrecorded
    }

    #[instrument(skip(self))]
    pub async fn run_once(&mut self) -> Result<CycleOutcome, CycleError> {
        let players = self.roster.snapshot().await;
        if players.is_empty() {
            warn!("Roster is empty, nothing to track");
        }

        let report = self.tracker.poll_cycle(&players).await;

        let mut seen = HashSet::new();
        let candidates: Vec<MatchRecord> = std::mem::take(&mut self.pending)
            .into_iter()
            .chain(report.matches)
            .filter(|record| seen.insert(record.match_id.clone()))
            .collect();

        let mut outcome = CycleOutcome {
            cycle_number: report.cycle_number,
            ..CycleOutcome::default()
        };

        let mut fresh = Vec::with_capacity(candidates.len());
        for record in candidates {
            if self.ledger.is_posted(&record.match_id).await {
                info!(match_id = %short_id(&record.match_id), "Skipping already posted match");
                outcome.already_posted += 1;
            } else {
                fresh.push(record);
            }
        }

        let published = self.publish_batch(fresh, &mut outcome).await;

        self.unrecorded
            .extend(published.iter().flat_map(HistoryEntry::flatten));
        self.record_history().await?;

        Ok(outcome)
    }

    /// Appends every unrecorded entry; on failure they stay queued
    async fn record_history(&mut self) -> Result<(), CycleError> {
        if self.unrecorded.is_empty() {
            return Ok(());
        }

        let count = self.unrecorded.len();
        if let Err(e) = self.history.append(self.unrecorded.clone()).await {
            warn!(
                entries = count,
                error = %e,
                "Could not record match history, will retry next cycle"
            );
            return Err(e.into());
        }

        self.unrecorded.clear();
        info!(entries = count, "Recorded player matches for weekly stats");
        Ok(())
    }

    async fn publish_batch(
        &mut self,
        records: Vec<MatchRecord>,
        outcome: &mut CycleOutcome,
    ) -> Vec<MatchRecord> {
        let total = records.len();
        let mut published = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            if index > 0 {
                sleep(self.post_delay).await;
            }

            let message =
                OutboundMessage::MatchAnnouncement(MatchAnnouncement::from_record(&record, index + 1, total));

            match self.publisher.publish(Destination::Matches, &message).await {
                Ok(()) => {
                    if let Err(e) = self.ledger.mark_posted([record.match_id.clone()]).await {
                        warn!(
                            match_id = %short_id(&record.match_id),
                            error = %e,
                            "Published match but could not persist the ledger"
                        );
                    }
                    info!(
                        position = index + 1,
                        total,
                        match_id = %short_id(&record.match_id),
                        players = ?record.players.keys().collect::<Vec<_>>(),
                        "Published match"
                    );
                    outcome.published.push(record.match_id.clone());
                    published.push(record);
                }
                Err(e) => {
                    warn!(
                        match_id = %short_id(&record.match_id),
                        error = %e,
                        "Could not publish match, will retry next cycle"
                    );
                    outcome.failed += 1;
                    if let Some(dropped) = queue_pending(&mut self.pending, record, MAX_PENDING) {
                        warn!(
                            match_id = %short_id(&dropped.match_id),
                            limit = MAX_PENDING,
                            "Pending queue full, dropped the oldest unpublished match"
                        );
                    }
                }
            }
        }

        published
    }
}

/// Queues `record` for the next cycle, evicting and returning the oldest
/// entry once `limit` records are waiting
fn queue_pending(
    pending: &mut Vec<MatchRecord>,
    record: MatchRecord,
    limit: usize,
) -> Option<MatchRecord> {
    let dropped = if pending.len() >= limit.max(1) {
        Some(pending.remove(0))
    } else {
        None
    };
    pending.push(record);
    dropped
}

/// Runs cycles forever. A failed or panicking cycle is logged and followed
/// by `cooldown` instead of `check_interval`.
pub async fn run_match_loop(
    mut runner: MatchCycleRunner,
    check_interval: Duration,
    cooldown: Duration,
) {
    info!(
        check_interval_secs = check_interval.as_secs(),
        "Starting match tracking loop"
    );

    loop {
        let wait = match AssertUnwindSafe(runner.run_once()).catch_unwind().await {
            Ok(Ok(outcome)) => {
                info!(
                    cycle = outcome.cycle_number,
                    published = outcome.published.len(),
                    already_posted = outcome.already_posted,
                    failed = outcome.failed,
                    next_check_secs = check_interval.as_secs(),
                    "Cycle complete"
                );
                check_interval
            }
            Ok(Err(e)) => {
                error!(error = %e, cooldown_secs = cooldown.as_secs(), "Cycle failed");
                cooldown
            }
            Err(_) => {
                error!(cooldown_secs = cooldown.as_secs(), "Cycle panicked");
                cooldown
            }
        };

        sleep(wait).await;
    }
}
