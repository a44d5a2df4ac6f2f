use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use super::ReportError;
use crate::config::WeeklyReportConfig;
use crate::publish::{weekly_messages, Destination, Publisher};
use crate::stats::WeeklyStatsService;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Published { best: String, messages: usize },
    NoData,
}

/// True when `now` falls in the configured weekday and hour and no report
/// went out earlier the same day
pub fn is_report_due(
    now: DateTime<Utc>,
    settings: &WeeklyReportConfig,
    last_published_on: Option<NaiveDate>,
) -> bool {
    now.weekday() == settings.weekday
        && now.hour() == settings.hour_utc
        && last_published_on != Some(now.date_naive())
}

pub struct WeeklyReporter {
    stats: Arc<WeeklyStatsService>,
    publisher: Arc<dyn Publisher>,
    settings: WeeklyReportConfig,
    post_delay: Duration,
    last_published_on: Mutex<Option<NaiveDate>>,
}

impl WeeklyReporter {
    pub fn new(
        stats: Arc<WeeklyStatsService>,
        publisher: Arc<dyn Publisher>,
        settings: WeeklyReportConfig,
        post_delay: Duration,
    ) -> Self {
        Self {
            stats,
            publisher,
            settings,
            post_delay,
            last_published_on: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &WeeklyReportConfig {
        &self.settings
    }

    /// Computes the summary and publishes the best-player message and the
    /// leaderboard to the weekly destination
    #[instrument(skip(self))]
    pub async fn publish_report(&self, now: DateTime<Utc>) -> Result<ReportOutcome, ReportError> {
        let Some(summary) = self
            .stats
            .weekly_summary(self.settings.lookback_days, now)
            .await?
        else {
            return Ok(ReportOutcome::NoData);
        };

        let messages = weekly_messages(&summary, self.settings.leaderboard_size);
        for (index, message) in messages.iter().enumerate() {
            if index > 0 {
                sleep(self.post_delay).await;
            }
            self.publisher.publish(Destination::Weekly, message).await?;
        }

        let best = summary
            .best()
            .map(|p| p.player.clone())
            .unwrap_or_default();
        info!(best = %best, messages = messages.len(), "Weekly report published");

        Ok(ReportOutcome::Published {
            best,
            messages: messages.len(),
        })
    }

    /// Publishes when the schedule says so, at most once per calendar day
    pub async fn run_if_due(&self, now: DateTime<Utc>) -> Result<Option<ReportOutcome>, ReportError> {
        let mut last = self.last_published_on.lock().await;
        if !is_report_due(now, &self.settings, *last) {
            return Ok(None);
        }

        let outcome = self.publish_report(now).await?;
        if outcome == ReportOutcome::NoData {
            warn!("No data available for the weekly report");
        }
        *last = Some(now.date_naive());
        Ok(Some(outcome))
    }
}

pub async fn run_weekly_loop(reporter: Arc<WeeklyReporter>, check_every: Duration) {
    run_weekly_loop_with_clock(reporter, check_every, Utc::now).await
}

/// Checks every `check_every`, asking `now` for the current time on each tick
pub async fn run_weekly_loop_with_clock<F>(
    reporter: Arc<WeeklyReporter>,
    check_every: Duration,
    now: F,
) where
    F: Fn() -> DateTime<Utc>,
{
    let settings = reporter.settings();
    info!(
        weekday = %settings.weekday,
        hour_utc = settings.hour_utc,
        check_every_secs = check_every.as_secs(),
        "Starting weekly report task"
    );

    let mut ticker = interval(check_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = reporter.run_if_due(now()).await {
            error!(error = %e, "Weekly report failed");
        }
    }
}
