use thiserror::Error;

use crate::publish::PublishError;
use crate::stats::StatsError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Could not append match history: {0}")]
    History(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
