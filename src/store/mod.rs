//! Persisted value stores.
//!
//! Every durable file the service owns (ledger, history, roster) is read and
//! written through [`Store`], so services only ever see whole values.

mod errors;
pub mod file;
pub mod memory;

pub use errors::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;

#[async_trait]
pub trait Store<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Returns `Ok(None)` when nothing has been persisted yet.
    async fn load(&self) -> Result<Option<T>, StoreError>;

    async fn save(&self, value: &T) -> Result<(), StoreError>;
}
