use thiserror::Error;

use super::Destination;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Request to {destination} channel failed: {reason}")]
    Transport {
        destination: Destination,
        reason: String,
    },

    #[error("{destination} channel rejected message with HTTP {status}")]
    Rejected { destination: Destination, status: u16 },

    #[error("Publisher unavailable: {0}")]
    Unavailable(String),
}
