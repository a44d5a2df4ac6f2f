use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::CommandError;
use crate::publish::OutboundMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandKind {
    AddPlayer,
    RemovePlayer,
    ListPlayers,
    WeeklyNow,
    TestPost,
}

impl CommandKind {
    pub fn parse(name: &str) -> Result<Self, CommandError> {
        let name = name.trim().trim_start_matches('!');
        name.parse().map_err(|_| CommandError::Unknown {
            name: name.to_string(),
            available: CommandKind::iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn requires_admin(self) -> bool {
        !matches!(self, CommandKind::ListPlayers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlayer(String),
    RemovePlayer(String),
    ListPlayers,
    WeeklyNow,
    /// Optional player to feature; defaults to the first on the roster
    TestPost(Option<String>),
}

impl Command {
    /// Player names may contain spaces, so the arguments are joined
    pub fn from_parts(kind: CommandKind, args: &[String]) -> Result<Self, CommandError> {
        let joined = args.join(" ").trim().to_string();
        let name = || -> Result<String, CommandError> {
            if joined.is_empty() {
                Err(CommandError::MissingArgument {
                    command: kind.into(),
                    argument: "player name",
                })
            } else {
                Ok(joined.clone())
            }
        };

        Ok(match kind {
            CommandKind::AddPlayer => Command::AddPlayer(name()?),
            CommandKind::RemovePlayer => Command::RemovePlayer(name()?),
            CommandKind::ListPlayers => Command::ListPlayers,
            CommandKind::WeeklyNow => Command::WeeklyNow,
            CommandKind::TestPost => Command::TestPost(name().ok()),
        })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddPlayer(_) => CommandKind::AddPlayer,
            Command::RemovePlayer(_) => CommandKind::RemovePlayer,
            Command::ListPlayers => CommandKind::ListPlayers,
            Command::WeeklyNow => CommandKind::WeeklyNow,
            Command::TestPost(_) => CommandKind::TestPost,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<String>,
    /// Number of messages sent to the channel
    #[serde(default)]
    pub published: usize,
    /// Rendered message that was built but not sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl CommandReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn preview_of(reply: impl Into<String>, message: &OutboundMessage) -> Self {
        Self {
            reply: reply.into(),
            preview: Some(message.to_string()),
            ..Self::default()
        }
    }
}
