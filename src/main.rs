use anyhow::Context;
use matchwatch::{
    commands::{handlers::routes, token::DEFAULT_EXPIRATION_DAYS, CommandService, TokenConfig},
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    history::{HistoryEntry, MatchHistory},
    ledger::PostingLedger,
    publish::{Publisher, WebhookPublisher},
    roster::{Roster, RosterFileStore},
    scheduler::{
        run_match_loop, run_weekly_loop, MatchCycleRunner, WeeklyReporter,
        CYCLE_FAILURE_COOLDOWN, WEEKLY_CHECK_INTERVAL,
    },
    shared::AppState,
    stats::WeeklyStatsService,
    stats_api::{PubgClient, RequestCounter, RetryPolicy, StatsApi},
    store::JsonFileStore,
    tracker::MatchTracker,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchwatch=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting match tracker");

    let config_path = std::env::var("MATCHWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let counter = RequestCounter::new();
    let api: Arc<dyn StatsApi> = Arc::new(PubgClient::new(
        &config.api_base_url,
        &config.api_key,
        RetryPolicy::with_max_attempts(config.max_retries),
        counter.clone(),
    )?);

    let roster = Arc::new(
        Roster::load(
            Arc::new(RosterFileStore::new(config.roster_path())),
            &config.platform,
        )
        .await
        .context("loading roster")?,
    );
    let players = roster.names().await;
    if players.is_empty() {
        warn!(
            path = %config.roster_path().display(),
            "No players to track; add names to the roster file or use the addplayer command"
        );
    }
    for (index, name) in players.iter().enumerate() {
        info!(position = index + 1, player = %name, "Tracking player");
    }

    let ledger = Arc::new(
        PostingLedger::load(
            Arc::new(JsonFileStore::<Vec<String>>::new(config.posted_matches_path())),
            config.posted_retention,
        )
        .await,
    );
    let history = Arc::new(MatchHistory::new(
        Arc::new(JsonFileStore::<Vec<HistoryEntry>>::new(config.history_path())),
        config.history_retention,
    ));

    let publisher: Arc<dyn Publisher> = Arc::new(WebhookPublisher::new(
        &config.match_webhook_url,
        config.weekly_webhook_url(),
    )?);

    let stats = Arc::new(WeeklyStatsService::new(Arc::clone(&history)));
    let reporter = Arc::new(WeeklyReporter::new(
        stats,
        Arc::clone(&publisher),
        config.weekly_report.clone(),
        config.post_delay(),
    ));

    let tracker = MatchTracker::new(api, counter, config.request_delay());
    let runner = MatchCycleRunner::new(
        tracker,
        Arc::clone(&roster),
        ledger,
        history,
        publisher,
        config.post_delay(),
    );

    tokio::spawn(run_match_loop(
        runner,
        config.check_interval(),
        CYCLE_FAILURE_COOLDOWN,
    ));
    tokio::spawn(run_weekly_loop(Arc::clone(&reporter), WEEKLY_CHECK_INTERVAL));

    let app_state = AppState::new(
        Arc::new(CommandService::new(roster, reporter)),
        TokenConfig::new(&config.admin_jwt_secret, DEFAULT_EXPIRATION_DAYS),
    );
    let app = routes(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    info!(address = %config.bind_address, "Command server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
