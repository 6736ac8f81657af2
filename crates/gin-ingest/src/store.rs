//! The store seam between the loader and the remote graph.

use async_trait::async_trait;

use gin_client::{ClientError, EntityHit, GinClient, SearchQuery, WriteOutcome};
use gin_core::{EntityId, EntityPayload};

/// Write and read access to an OpenGIN store.
///
/// Writes never fail with `Err`: transport problems come back as
/// [`WriteOutcome::Failed`] so the caller can move on to the next entity.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert-only create.
    async fn create(&self, payload: &EntityPayload) -> WriteOutcome;

    /// Upsert by identifier.
    async fn update(&self, entity_id: &EntityId, payload: &EntityPayload) -> WriteOutcome;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<EntityHit>, ClientError>;
}

#[async_trait]
impl EntityStore for GinClient {
    async fn create(&self, payload: &EntityPayload) -> WriteOutcome {
        self.create_entity(payload).await
    }

    async fn update(&self, entity_id: &EntityId, payload: &EntityPayload) -> WriteOutcome {
        self.update_entity(entity_id.as_str(), payload).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<EntityHit>, ClientError> {
        GinClient::search(self, query).await
    }
}
