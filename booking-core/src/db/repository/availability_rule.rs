//! Availability Rule store interface

use async_trait::async_trait;
use shared::models::{AvailabilityRule, AvailabilityRuleCreate, AvailabilityRuleUpdate};
use uuid::Uuid;

use super::RepoResult;

#[async_trait]
pub trait AvailabilityRuleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<AvailabilityRule>>;
    /// All rules of a resource, oldest first (read path; no tenant filter)
    async fn find_by_resource(&self, resource_id: Uuid) -> RepoResult<Vec<AvailabilityRule>>;
    /// Tenant-scoped listing for rule management
    async fn find_by_resource_and_owner(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
    ) -> RepoResult<Vec<AvailabilityRule>>;
    async fn create(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
        data: AvailabilityRuleCreate,
    ) -> RepoResult<AvailabilityRule>;
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: AvailabilityRuleUpdate,
    ) -> RepoResult<AvailabilityRule>;
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool>;
}
