//! Outbound messages and the channel they are published to.

mod errors;
pub mod memory;
pub mod models;
pub mod render;
pub mod webhook;

pub use errors::PublishError;
pub use memory::InMemoryPublisher;
pub use models::*;
pub use webhook::WebhookPublisher;

use async_trait::async_trait;

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        destination: Destination,
        message: &OutboundMessage,
    ) -> Result<(), PublishError>;
}
