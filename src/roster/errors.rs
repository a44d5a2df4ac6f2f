use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{0} is already tracked")]
    AlreadyTracked(String),

    #[error("{0} is not tracked")]
    NotTracked(String),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),

    #[error("Could not persist roster: {0}")]
    Store(#[from] StoreError),
}
