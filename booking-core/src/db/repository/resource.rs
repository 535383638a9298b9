//! Resource store interface

use async_trait::async_trait;
use shared::models::{Resource, ResourceCreate, ResourceUpdate};
use uuid::Uuid;

use super::RepoResult;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Resource>>;
    async fn find_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Resource>>;
    async fn create(&self, owner_id: Uuid, data: ResourceCreate) -> RepoResult<Resource>;
    /// Owner-scoped update; a foreign owner sees NotFound
    async fn update(&self, id: Uuid, owner_id: Uuid, data: ResourceUpdate) -> RepoResult<Resource>;
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool>;
}
