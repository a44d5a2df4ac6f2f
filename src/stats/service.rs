use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{aggregate::MAX_LOOKBACK_DAYS, compute_weekly_best, StatsError, WeeklySummary};
use crate::history::MatchHistory;

/// Weekly rankings recomputed from the persisted match history on every call
pub struct WeeklyStatsService {
    history: Arc<MatchHistory>,
}

impl WeeklyStatsService {
    pub fn new(history: Arc<MatchHistory>) -> Self {
        Self { history }
    }

    #[instrument(skip(self))]
    pub async fn weekly_summary(
        &self,
        lookback_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<WeeklySummary>, StatsError> {
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(StatsError::Validation(format!(
                "lookback must be between 1 and {MAX_LOOKBACK_DAYS} days, got {lookback_days}"
            )));
        }

        let entries = self.history.load().await;
        let summary = compute_weekly_best(&entries, lookback_days, now);

        match &summary {
            Some(summary) => info!(
                history_entries = entries.len(),
                matches_considered = summary.total_matches,
                players = summary.ranked.len(),
                best = summary.best().map(|p| p.player.as_str()).unwrap_or_default(),
                "Computed weekly summary"
            ),
            None => warn!(
                history_entries = entries.len(),
                lookback_days, "No eligible matches in the lookback window"
            ),
        }

        Ok(summary)
    }
}
