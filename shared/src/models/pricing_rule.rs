//! Pricing Rule Model

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DaySet;

/// Duration type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationType {
    PerHour,
    PerDay,
    /// One item per booking (e.g. a session)
    PerItem,
    FixedPrice,
}

/// Pricing rule entity
///
/// Several rules may exist per resource; the resolver picks one per booking
/// attempt. `applicable_days = None` means the rule holds on every day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub owner_id: Uuid,
    pub duration_type: DurationType,
    /// Base price per duration unit (positive)
    pub base_price: Decimal,
    /// Bounds in units of `duration_type` (hours or days)
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
    pub applicable_days: Option<DaySet>,
    pub start_time_of_day: Option<NaiveTime>,
    pub end_time_of_day: Option<NaiveTime>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create pricing rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRuleCreate {
    pub duration_type: DurationType,
    pub base_price: Decimal,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
    pub applicable_days: Option<DaySet>,
    pub start_time_of_day: Option<NaiveTime>,
    pub end_time_of_day: Option<NaiveTime>,
    pub description: Option<String>,
}

impl PricingRuleCreate {
    /// Shape invariants enforced at the store boundary
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.base_price <= Decimal::ZERO {
            return Err("base_price must be positive".into());
        }
        if let (Some(min), Some(max)) = (self.min_duration, self.max_duration)
            && min > max
        {
            return Err("min_duration must not exceed max_duration".into());
        }
        if let (Some(from), Some(until)) = (self.start_time_of_day, self.end_time_of_day)
            && from >= until
        {
            return Err("start_time_of_day must be before end_time_of_day".into());
        }
        Ok(())
    }
}

/// Update pricing rule payload; only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingRuleUpdate {
    pub duration_type: Option<DurationType>,
    pub base_price: Option<Decimal>,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
    pub applicable_days: Option<DaySet>,
    pub start_time_of_day: Option<NaiveTime>,
    pub end_time_of_day: Option<NaiveTime>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}
