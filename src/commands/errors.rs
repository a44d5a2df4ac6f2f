use thiserror::Error;

use crate::roster::RosterError;
use crate::scheduler::ReportError;
use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command '{name}' (available: {available})")]
    Unknown { name: String, available: String },

    #[error("Command '{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<CommandError> for AppError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::Unknown { .. } | CommandError::MissingArgument { .. } => {
                AppError::BadRequest(error.to_string())
            }
            CommandError::Roster(RosterError::InvalidName(_)) => {
                AppError::BadRequest(error.to_string())
            }
            CommandError::Roster(RosterError::AlreadyTracked(_)) => {
                AppError::Conflict(error.to_string())
            }
            CommandError::Roster(RosterError::NotTracked(_)) => {
                AppError::NotFound(error.to_string())
            }
            CommandError::Roster(RosterError::Store(_)) | CommandError::Report(_) => {
                AppError::Internal(error.to_string())
            }
        }
    }
}
