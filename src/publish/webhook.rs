use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{Destination, OutboundMessage, PublishError, Publisher};

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct WebhookPayload<'a> {
    /// Plain-text rendering for chat webhooks
    content: String,
    /// Structured form for consumers that format their own layout
    message: &'a OutboundMessage,
}

/// Publishes messages as JSON `POST`s to one webhook URL per destination
pub struct WebhookPublisher {
    http: Client,
    matches_url: String,
    weekly_url: String,
}

impl WebhookPublisher {
    pub fn new(
        matches_url: impl Into<String>,
        weekly_url: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let http = Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            matches_url: matches_url.into(),
            weekly_url: weekly_url.into(),
        })
    }

    fn url(&self, destination: Destination) -> &str {
        match destination {
            Destination::Matches => &self.matches_url,
            Destination::Weekly => &self.weekly_url,
        }
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    #[instrument(skip(self, message))]
    async fn publish(
        &self,
        destination: Destination,
        message: &OutboundMessage,
    ) -> Result<(), PublishError> {
        let payload = WebhookPayload {
            content: message.to_string(),
            message,
        };

        let response = self
            .http
            .post(self.url(destination))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PublishError::Transport {
                destination,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Rejected {
                destination,
                status: status.as_u16(),
            });
        }

        debug!(%destination, status = status.as_u16(), "Message published");
        Ok(())
    }
}
