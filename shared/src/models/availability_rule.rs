//! Availability Rule Model

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DayOfWeek;

/// Rule kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Recurs every week on `day_of_week`
    Regular,
    /// Applies to `specific_date` only
    Exception,
}

/// Availability rule entity
///
/// Regular rules always carry a day-of-week and no date; exception rules
/// always carry a date and no day-of-week. `is_available = false` on an
/// exception blocks time inside an otherwise open window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub owner_id: Uuid,
    pub kind: RuleKind,
    pub day_of_week: Option<DayOfWeek>,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AvailabilityRule {
    /// Whether this rule contributes to the given calendar date
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            RuleKind::Regular => self.day_of_week == Some(DayOfWeek::from(date.weekday())),
            RuleKind::Exception => self.specific_date == Some(date),
        }
    }
}

/// Create availability rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRuleCreate {
    pub kind: RuleKind,
    pub day_of_week: Option<DayOfWeek>,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: Option<bool>,
}

impl AvailabilityRuleCreate {
    /// Shape invariants enforced at the store boundary
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.start_time >= self.end_time {
            return Err("start_time must be before end_time".into());
        }
        match self.kind {
            RuleKind::Regular => {
                if self.day_of_week.is_none() {
                    return Err("REGULAR rules require day_of_week".into());
                }
                if self.specific_date.is_some() {
                    return Err("REGULAR rules must not carry specific_date".into());
                }
            }
            RuleKind::Exception => {
                if self.specific_date.is_none() {
                    return Err("EXCEPTION rules require specific_date".into());
                }
                if self.day_of_week.is_some() {
                    return Err("EXCEPTION rules must not carry day_of_week".into());
                }
            }
        }
        Ok(())
    }
}

/// Update availability rule payload; only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityRuleUpdate {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: Option<bool>,
}
