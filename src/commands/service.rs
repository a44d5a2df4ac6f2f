use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{Command, CommandError, CommandKind, CommandReply};
use crate::publish::{MatchAnnouncement, OutboundMessage};
use crate::roster::Roster;
use crate::scheduler::{ReportOutcome, WeeklyReporter};
use crate::tracker::{MatchCategory, MatchRecord, PlayerMatchStats};

/// A plausible single-player match used to preview announcements
pub fn sample_match_record(player_name: &str) -> MatchRecord {
    let mut players = BTreeMap::new();
    players.insert(
        player_name.to_string(),
        PlayerMatchStats {
            rank: 4,
            kills: 3,
            damage_dealt: 450.5,
            assists: 1,
            dbnos: 2,
            headshot_kills: 1,
            longest_kill: 187.3,
            revives: 1,
            heals_used: 3,
            boosts_used: 2,
            survival_time_minutes: 24.5,
            ..PlayerMatchStats::default()
        },
    );

    MatchRecord {
        match_id: format!("test-{}", Uuid::new_v4()),
        category: MatchCategory::Normal,
        game_mode: "squad".to_string(),
        match_type: "official".to_string(),
        map: "Baltic_Main".to_string(),
        duration_seconds: 28 * 60,
        played_at: Utc::now().to_rfc3339(),
        players,
    }
}

pub struct CommandService {
    roster: Arc<Roster>,
    reporter: Arc<WeeklyReporter>,
}

impl CommandService {
    pub fn new(roster: Arc<Roster>, reporter: Arc<WeeklyReporter>) -> Self {
        Self { roster, reporter }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, command: Command) -> Result<CommandReply, CommandError> {
        let reply = match command {
            Command::AddPlayer(name) => {
                let added = self.roster.add(&name).await?;
                let count = self.roster.names().await.len();
                CommandReply::text(format!("Now tracking {added} ({count} players)"))
            }
            Command::RemovePlayer(name) => {
                let removed = self.roster.remove(&name).await?;
                let count = self.roster.names().await.len();
                CommandReply::text(format!("Stopped tracking {removed} ({count} players)"))
            }
            Command::ListPlayers => {
                let players = self.roster.names().await;
                let reply = if players.is_empty() {
                    "No players are being tracked".to_string()
                } else {
                    format!("Tracking {} players", players.len())
                };
                CommandReply {
                    reply,
                    players,
                    ..CommandReply::default()
                }
            }
            Command::WeeklyNow => self.weekly_now().await?,
            Command::TestPost(name) => self.test_post(name).await?,
        };

        info!(reply = %reply.reply, "Command executed");
        Ok(reply)
    }

    async fn weekly_now(&self) -> Result<CommandReply, CommandError> {
        let days = self.reporter.settings().lookback_days;
        match self.reporter.publish_report(Utc::now()).await? {
            ReportOutcome::Published { best, messages } => Ok(CommandReply {
                reply: format!("Weekly report published; best player of the last {days} days: {best}"),
                published: messages,
                ..CommandReply::default()
            }),
            ReportOutcome::NoData => Ok(CommandReply::text(format!(
                "No data: no eligible matches in the last {days} days"
            ))),
        }
    }

    async fn test_post(&self, name: Option<String>) -> Result<CommandReply, CommandError> {
        let player = match name {
            Some(name) => name,
            None => self
                .roster
                .names()
                .await
                .into_iter()
                .next()
                .ok_or(CommandError::MissingArgument {
                    command: CommandKind::TestPost.into(),
                    argument: "player name (the roster is empty)",
                })?,
        };

        let record = sample_match_record(&player);
        let message = OutboundMessage::MatchAnnouncement(MatchAnnouncement::from_record(&record, 1, 1));
        Ok(CommandReply::preview_of(
            format!("Test announcement for {player} (not published)"),
            &message,
        ))
    }
}
