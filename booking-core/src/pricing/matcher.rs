//! Pricing Rule Matcher
//!
//! Applicability checks for a candidate interval and the deterministic
//! tie-break used when several rules match.

use chrono::{DateTime, Datelike, Timelike, Utc};
use shared::models::{DurationType, PricingRule};
use shared::types::DayOfWeek;
use uuid::Uuid;

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Whether a rule applies to `[start, end)`.
///
/// Conjunction of: active flag, applicable-days membership (empty or absent
/// set means every day), time-of-day window containment, and the rule's
/// duration bounds in its own unit.
pub fn rule_matches(rule: &PricingRule, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    if !rule.is_active {
        return false;
    }

    let day = DayOfWeek::from(start.weekday());
    if let Some(days) = rule.applicable_days
        && !days.is_empty()
        && !days.contains(day)
    {
        return false;
    }

    if let Some(from) = rule.start_time_of_day
        && from > start.time()
    {
        return false;
    }
    if let Some(until) = rule.end_time_of_day
        && until < end.time()
    {
        return false;
    }

    duration_within_bounds(rule, start, end)
}

fn duration_within_bounds(rule: &PricingRule, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let unit_secs = match rule.duration_type {
        DurationType::PerHour => SECS_PER_HOUR,
        DurationType::PerDay => SECS_PER_DAY,
        // Item and fixed pricing carry no duration unit
        DurationType::PerItem | DurationType::FixedPrice => return true,
    };
    let secs = (end - start).num_seconds();
    if let Some(min) = rule.min_duration
        && secs < i64::from(min) * unit_secs
    {
        return false;
    }
    if let Some(max) = rule.max_duration
        && secs > i64::from(max) * unit_secs
    {
        return false;
    }
    true
}

/// Specificity key: fewest applicable days, then narrowest time-of-day
/// window, then oldest rule. Total order, so selection never depends on
/// storage order.
fn specificity(rule: &PricingRule) -> (u32, i64, DateTime<Utc>, Uuid) {
    let days = match rule.applicable_days {
        Some(set) if !set.is_empty() => set.len(),
        _ => 7,
    };
    let from = rule
        .start_time_of_day
        .map(|t| i64::from(t.num_seconds_from_midnight()))
        .unwrap_or(0);
    let until = rule
        .end_time_of_day
        .map(|t| i64::from(t.num_seconds_from_midnight()))
        .unwrap_or(SECS_PER_DAY);
    (days, until - from, rule.created_at, rule.id)
}

/// The winning rule for the candidate interval, if any matches
pub fn select_rule<'a>(
    rules: &'a [PricingRule],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&'a PricingRule> {
    rules
        .iter()
        .filter(|r| rule_matches(r, start, end))
        .min_by_key(|r| specificity(r))
}
