//! Pricing resolution
//!
//! Selects the one pricing rule applicable to a candidate interval
//! ([`matcher`]) and computes the total ([`calculator`]). A missing rule is
//! an error; bookings are never silently priced at zero.

pub mod calculator;
pub mod matcher;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::PricingRule;
use shared::{AppError, AppResult};
use uuid::Uuid;

use crate::db::repository::PricingRuleRepository;

#[derive(Clone)]
pub struct PricingResolver {
    rules: Arc<dyn PricingRuleRepository>,
}

impl PricingResolver {
    pub fn new(rules: Arc<dyn PricingRuleRepository>) -> Self {
        Self { rules }
    }

    /// The applicable rule for `[start, end)` on the resource
    pub async fn resolve(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<PricingRule> {
        let rules = self.rules.find_active_for_resource(resource_id).await?;
        matcher::select_rule(&rules, start, end)
            .cloned()
            .ok_or(AppError::PricingNotFound {
                resource_id,
                start_time: start,
                end_time: end,
            })
    }

    /// Resolve and price in one step
    pub async fn quote(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<(PricingRule, Decimal)> {
        let rule = self.resolve(resource_id, start, end).await?;
        let total = calculator::price(&rule, start, end);
        Ok((rule, total))
    }
}
