//! Price Calculator
//!
//! Computes booking totals from a pricing rule using rust_decimal.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{DurationType, PricingRule};

/// Monetary rounding: two decimals, always up. Protects the owner's minimum
/// charge; prices are positive, so away-from-zero is the ceiling.
const DECIMAL_PLACES: u32 = 2;
const ROUNDING: RoundingStrategy = RoundingStrategy::AwayFromZero;

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Total price for `[start, end)` under the given rule.
///
/// - FIXED_PRICE and PER_ITEM charge the base price once
/// - PER_DAY charges per started day (minimum one for non-empty intervals)
/// - PER_HOUR charges fractional hours
pub fn price(rule: &PricingRule, start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let secs = (end - start).num_seconds().max(0);
    let total = match rule.duration_type {
        DurationType::FixedPrice | DurationType::PerItem => rule.base_price,
        DurationType::PerDay => {
            let mut days = (Decimal::from(secs) / Decimal::from(SECS_PER_DAY)).ceil();
            if days.is_zero() && secs > 0 {
                days = Decimal::ONE;
            }
            days * rule.base_price
        }
        DurationType::PerHour => {
            Decimal::from(secs) / Decimal::from(SECS_PER_HOUR) * rule.base_price
        }
    };
    total.round_dp_with_strategy(DECIMAL_PLACES, ROUNDING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;
    use uuid::Uuid;

    fn ts(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, sec).unwrap()
    }

    fn rule(duration_type: DurationType, base_price: &str) -> PricingRule {
        let now = ts(0, 0, 0);
        PricingRule {
            id: Uuid::new_v4(),
            resource_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            duration_type,
            base_price: Decimal::from_str(base_price).unwrap(),
            min_duration: None,
            max_duration: None,
            applicable_days: None,
            start_time_of_day: None,
            end_time_of_day: None,
            is_active: true,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn per_hour_fractional() {
        // 1h15m at 10.00/h = 12.50
        let r = rule(DurationType::PerHour, "10.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(10, 15, 0)), dec("12.50"));
    }

    #[test]
    fn per_hour_rounds_up_to_two_decimals() {
        // 1h1s at 10.00/h = 10.00277... -> 10.01, never down
        let r = rule(DurationType::PerHour, "10.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(10, 0, 1)), dec("10.01"));
    }

    #[test]
    fn per_day_charges_started_days() {
        // 25 hours at 100.00/day starts a second day = 200.00
        let r = rule(DurationType::PerDay, "100.00");
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        assert_eq!(price(&r, start, end), dec("200.00"));
    }

    #[test]
    fn per_day_minimum_is_one_day() {
        let r = rule(DurationType::PerDay, "100.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(10, 0, 0)), dec("100.00"));
    }

    #[test]
    fn fixed_price_ignores_duration() {
        let r = rule(DurationType::FixedPrice, "35.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(18, 0, 0)), dec("35.00"));
        assert_eq!(price(&r, ts(9, 0, 0), ts(9, 30, 0)), dec("35.00"));
    }

    #[test]
    fn per_item_charges_once_per_booking() {
        let r = rule(DurationType::PerItem, "15.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(11, 0, 0)), dec("15.00"));
    }

    #[test]
    fn empty_interval_per_day_is_zero() {
        let r = rule(DurationType::PerDay, "100.00");
        assert_eq!(price(&r, ts(9, 0, 0), ts(9, 0, 0)), dec("0.00"));
    }
}
