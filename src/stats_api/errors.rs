use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    #[error("No matches found for '{0}'")]
    NoMatches(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed {context} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Could not decode response for {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Expected outcomes that only mean "nothing to do for this player"
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ApiError::PlayerNotFound(_) | ApiError::NoMatches(_) | ApiError::NotFound(_)
        )
    }

    /// Failures that may clear up by themselves. A missing or undecodable
    /// resource will fail the same way next time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RetriesExhausted { .. } | ApiError::Client(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::RetriesExhausted { context: "m".into(), attempts: 3, last_error: "HTTP 503".into() }, true)]
    #[case(ApiError::Client("tls".into()), true)]
    #[case(ApiError::NotFound("match m".into()), false)]
    #[case(ApiError::Decode { context: "match m".into(), reason: "eof".into() }, false)]
    #[case(ApiError::PlayerNotFound("Ghost".into()), false)]
    fn test_is_retryable(#[case] error: ApiError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }
}
