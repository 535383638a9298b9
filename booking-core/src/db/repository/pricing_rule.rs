//! Pricing Rule store interface

use async_trait::async_trait;
use shared::models::{PricingRule, PricingRuleCreate, PricingRuleUpdate};
use uuid::Uuid;

use super::RepoResult;

#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<PricingRule>>;
    /// Active rules of a resource, oldest first (resolver input)
    async fn find_active_for_resource(&self, resource_id: Uuid) -> RepoResult<Vec<PricingRule>>;
    /// Tenant-scoped listing for rule management
    async fn find_by_resource_and_owner(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
    ) -> RepoResult<Vec<PricingRule>>;
    async fn create(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
        data: PricingRuleCreate,
    ) -> RepoResult<PricingRule>;
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: PricingRuleUpdate,
    ) -> RepoResult<PricingRule>;
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool>;
}
