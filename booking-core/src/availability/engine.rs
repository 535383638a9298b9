//! Availability expansion
//!
//! Expands a resource's availability rules into concrete bookable windows
//! over a date range, then removes blocking exceptions and active bookings.
//! Pure functions over slices; the store is the caller's concern. Days with
//! no matching rule produce nothing: availability is granted explicitly.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use shared::models::{AvailabilityRule, Booking, Resource, RuleKind};

use super::interval::{self, Interval};

/// A fixed-size bookable unit with remaining capacity (SLOT_BASED)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity_available: i32,
}

/// An open window of arbitrary length (DURATION_BASED)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

fn rule_interval(rule: &AvailabilityRule, date: NaiveDate) -> Interval {
    Interval::new(at(date, rule.start_time), at(date, rule.end_time))
}

/// Windows granted on `date` by regular and exception rules, as a union
fn granting_windows(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<Interval> {
    interval::union(
        rules
            .iter()
            .filter(|r| r.is_available && r.applies_on(date))
            .map(|r| rule_interval(r, date))
            .collect(),
    )
}

/// Windows removed on `date` by blocking exceptions
fn blocking_windows(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<Interval> {
    rules
        .iter()
        .filter(|r| !r.is_available && r.kind == RuleKind::Exception && r.applies_on(date))
        .map(|r| rule_interval(r, date))
        .collect()
}

fn dates(start_date: NaiveDate, end_date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start_date.iter_days().take_while(move |d| *d <= end_date)
}

/// Slot expansion for SLOT_BASED resources.
///
/// Windows are partitioned from their start; a trailing remainder shorter
/// than a slot is dropped. A slot survives when it intersects no blocking
/// exception and still has capacity after subtracting overlapping active
/// bookings.
pub fn compute_slots(
    resource: &Resource,
    rules: &[AvailabilityRule],
    bookings: &[Booking],
    start_date: NaiveDate,
    end_date: NaiveDate,
    slot_minutes: u32,
) -> Vec<Slot> {
    let slot_len = Duration::minutes(i64::from(slot_minutes.max(1)));
    let capacity = resource.effective_capacity();

    // Keyed by start: a window reachable through two rules yields one slot
    let mut slots: BTreeMap<DateTime<Utc>, Slot> = BTreeMap::new();

    for date in dates(start_date, end_date) {
        let blocking = blocking_windows(rules, date);
        for window in granting_windows(rules, date) {
            let mut cursor = window.start;
            loop {
                let slot_end = cursor + slot_len;
                if slot_end > window.end {
                    break;
                }
                let candidate = Interval::new(cursor, slot_end);
                if !blocking.iter().any(|b| b.overlaps(&candidate)) {
                    slots.insert(
                        cursor,
                        Slot {
                            start_time: cursor,
                            end_time: slot_end,
                            capacity_available: capacity,
                        },
                    );
                }
                cursor = slot_end;
            }
        }
    }

    for booking in bookings.iter().filter(|b| b.status.is_active()) {
        for slot in slots.values_mut() {
            if booking.start_time < slot.end_time && booking.end_time > slot.start_time {
                slot.capacity_available -= 1;
            }
        }
    }

    slots
        .into_values()
        .filter(|s| s.capacity_available > 0)
        .collect()
}

/// Free-block computation for DURATION_BASED resources.
///
/// The day's net availability (granted windows minus blocking exceptions)
/// loses every active booking through a three-way split; empty remainders
/// are discarded.
pub fn compute_free_blocks(
    rules: &[AvailabilityRule],
    bookings: &[Booking],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<FreeBlock> {
    let mut blocks: Vec<Interval> = Vec::new();
    for date in dates(start_date, end_date) {
        let mut windows = granting_windows(rules, date);
        for cut in blocking_windows(rules, date) {
            windows = interval::subtract(windows, cut);
        }
        blocks.extend(windows);
    }

    for booking in bookings.iter().filter(|b| b.status.is_active()) {
        blocks = interval::subtract(
            blocks,
            Interval::new(booking.start_time, booking.end_time),
        );
    }

    blocks
        .into_iter()
        .filter(|b| !b.is_empty())
        .map(|b| FreeBlock {
            start_time: b.start,
            end_time: b.end,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use shared::models::{BookingStatus, BookingType, PaymentStatus};
    use shared::types::DayOfWeek;
    use uuid::Uuid;

    // 2025-06-02 is a Monday
    const YEAR: i32 = 2025;
    const MONTH: u32 = 6;
    const MONDAY: u32 = 2;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(YEAR, MONTH, MONDAY).unwrap()
    }

    fn ts(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(YEAR, MONTH, day, hour, min, 0).unwrap()
    }

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    fn resource(capacity: Option<i32>, booking_type: BookingType) -> Resource {
        let now = ts(1, 0, 0);
        Resource {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "test".into(),
            description: None,
            capacity,
            booking_type,
            is_active: true,
            max_bookings_per_day: None,
            max_bookings_per_customer: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn regular_rule(resource: &Resource, day: DayOfWeek, from: NaiveTime, to: NaiveTime) -> AvailabilityRule {
        let now = ts(1, 0, 0);
        AvailabilityRule {
            id: Uuid::new_v4(),
            resource_id: resource.id,
            owner_id: resource.owner_id,
            kind: RuleKind::Regular,
            day_of_week: Some(day),
            specific_date: None,
            start_time: from,
            end_time: to,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn exception_rule(
        resource: &Resource,
        date: NaiveDate,
        from: NaiveTime,
        to: NaiveTime,
        is_available: bool,
    ) -> AvailabilityRule {
        let now = ts(1, 0, 0);
        AvailabilityRule {
            id: Uuid::new_v4(),
            resource_id: resource.id,
            owner_id: resource.owner_id,
            kind: RuleKind::Exception,
            day_of_week: None,
            specific_date: Some(date),
            start_time: from,
            end_time: to,
            is_available,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(resource: &Resource, start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            resource_id: resource.id,
            customer_id: Uuid::new_v4(),
            owner_id: resource.owner_id,
            start_time: start,
            end_time: end,
            total_price: Decimal::ZERO,
            deposit_amount: None,
            status,
            payment_status: PaymentStatus::Pending,
            parent_booking_id: None,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn closed_by_default() {
        let res = resource(None, BookingType::SlotBased);
        let slots = compute_slots(&res, &[], &[], monday(), monday(), 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn exhausted_slot_is_dropped_capacity_reported() {
        // capacity=2, Monday 09:00-10:00, two confirmed bookings 09:00-09:30:
        // the first slot is exhausted and dropped, the second keeps full
        // capacity
        let res = resource(Some(2), BookingType::SlotBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(9, 0), hm(10, 0))];
        let bookings = [
            booking(&res, ts(MONDAY, 9, 0), ts(MONDAY, 9, 30), BookingStatus::Confirmed),
            booking(&res, ts(MONDAY, 9, 0), ts(MONDAY, 9, 30), BookingStatus::Confirmed),
        ];

        let slots = compute_slots(&res, &rules, &bookings, monday(), monday(), 30);
        assert_eq!(
            slots,
            vec![Slot {
                start_time: ts(MONDAY, 9, 30),
                end_time: ts(MONDAY, 10, 0),
                capacity_available: 2,
            }]
        );
    }

    #[test]
    fn slot_capacity_formula_holds() {
        // capacity_available = capacity - overlapping active bookings
        let res = resource(Some(3), BookingType::SlotBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(9, 0), hm(10, 0))];
        let bookings = [
            booking(&res, ts(MONDAY, 9, 0), ts(MONDAY, 10, 0), BookingStatus::Pending),
            booking(&res, ts(MONDAY, 9, 30), ts(MONDAY, 10, 0), BookingStatus::Confirmed),
            // inactive statuses never count
            booking(&res, ts(MONDAY, 9, 0), ts(MONDAY, 10, 0), BookingStatus::Cancelled),
        ];

        let slots = compute_slots(&res, &rules, &bookings, monday(), monday(), 30);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].capacity_available, 2);
        assert_eq!(slots[1].capacity_available, 1);
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        let res = resource(Some(1), BookingType::SlotBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(9, 0), hm(9, 45))];
        let slots = compute_slots(&res, &rules, &[], monday(), monday(), 30);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end_time, ts(MONDAY, 9, 30));
    }

    #[test]
    fn blocking_exception_removes_intersecting_slots() {
        let res = resource(Some(1), BookingType::SlotBased);
        let rules = [
            regular_rule(&res, DayOfWeek::Monday, hm(9, 0), hm(11, 0)),
            exception_rule(&res, monday(), hm(9, 40), hm(10, 10), false),
        ];
        let slots = compute_slots(&res, &rules, &[], monday(), monday(), 30);
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![ts(MONDAY, 9, 0), ts(MONDAY, 10, 30)]);
    }

    #[test]
    fn exception_grants_availability_on_closed_day() {
        // Tuesday has no regular rule; an exception opens it
        let res = resource(Some(1), BookingType::SlotBased);
        let tuesday = monday().succ_opt().unwrap();
        let rules = [exception_rule(&res, tuesday, hm(14, 0), hm(15, 0), true)];

        let slots = compute_slots(&res, &rules, &[], tuesday, tuesday, 30);
        assert_eq!(slots.len(), 2);

        // ...and only on that date
        let next_tuesday = tuesday + Duration::days(7);
        let slots = compute_slots(&res, &rules, &[], next_tuesday, next_tuesday, 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn booking_splits_free_block_in_two() {
        let res = resource(None, BookingType::DurationBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(8, 0), hm(12, 0))];
        let bookings = [booking(
            &res,
            ts(MONDAY, 9, 0),
            ts(MONDAY, 10, 0),
            BookingStatus::Confirmed,
        )];

        let blocks = compute_free_blocks(&rules, &bookings, monday(), monday());
        assert_eq!(
            blocks,
            vec![
                FreeBlock {
                    start_time: ts(MONDAY, 8, 0),
                    end_time: ts(MONDAY, 9, 0),
                },
                FreeBlock {
                    start_time: ts(MONDAY, 10, 0),
                    end_time: ts(MONDAY, 12, 0),
                },
            ]
        );
    }

    #[test]
    fn empty_booking_set_leaves_windows_unchanged() {
        let res = resource(None, BookingType::DurationBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(8, 0), hm(12, 0))];
        let blocks = compute_free_blocks(&rules, &[], monday(), monday());
        assert_eq!(
            blocks,
            vec![FreeBlock {
                start_time: ts(MONDAY, 8, 0),
                end_time: ts(MONDAY, 12, 0),
            }]
        );
    }

    #[test]
    fn full_cover_leaves_no_free_blocks() {
        let res = resource(None, BookingType::DurationBased);
        let rules = [regular_rule(&res, DayOfWeek::Monday, hm(8, 0), hm(12, 0))];
        let bookings = [booking(
            &res,
            ts(MONDAY, 8, 0),
            ts(MONDAY, 12, 0),
            BookingStatus::Pending,
        )];
        let blocks = compute_free_blocks(&rules, &bookings, monday(), monday());
        assert!(blocks.is_empty());
    }

    #[test]
    fn duration_mode_subtracts_blocking_exceptions() {
        let res = resource(None, BookingType::DurationBased);
        let rules = [
            regular_rule(&res, DayOfWeek::Monday, hm(8, 0), hm(12, 0)),
            exception_rule(&res, monday(), hm(10, 0), hm(11, 0), false),
        ];
        let blocks = compute_free_blocks(&rules, &[], monday(), monday());
        assert_eq!(
            blocks,
            vec![
                FreeBlock {
                    start_time: ts(MONDAY, 8, 0),
                    end_time: ts(MONDAY, 10, 0),
                },
                FreeBlock {
                    start_time: ts(MONDAY, 11, 0),
                    end_time: ts(MONDAY, 12, 0),
                },
            ]
        );
    }

    #[test]
    fn overlapping_rules_merge_before_partitioning() {
        let res = resource(Some(1), BookingType::SlotBased);
        let rules = [
            regular_rule(&res, DayOfWeek::Monday, hm(9, 0), hm(10, 0)),
            regular_rule(&res, DayOfWeek::Monday, hm(9, 30), hm(11, 0)),
        ];
        let slots = compute_slots(&res, &rules, &[], monday(), monday(), 30);
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(
            starts,
            vec![ts(MONDAY, 9, 0), ts(MONDAY, 9, 30), ts(MONDAY, 10, 0), ts(MONDAY, 10, 30)]
        );
    }
}
