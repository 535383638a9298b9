//! Booking Conflict Detector
//!
//! Overlap and capacity checks over a resource's active bookings. Rejected,
//! cancelled and completed bookings never conflict.

use chrono::{DateTime, Utc};
use shared::models::Booking;
use uuid::Uuid;

/// Active bookings overlapping the half-open `[start, end)`, excluding the
/// booking being rescheduled if an id is supplied
pub fn conflicting<'a>(
    bookings: &'a [Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.status.is_active())
        .filter(|b| Some(b.id) != exclude)
        .filter(|b| b.start_time < end && b.end_time > start)
        .collect()
}

/// Whether admitting the candidate would push simultaneous occupancy past
/// `capacity` at any instant.
///
/// With half-open intervals occupancy only rises at interval starts, so the
/// candidate start plus every overlapping booking start inside the
/// candidate range covers all instants worth checking.
pub fn exceeds_capacity(
    overlapping: &[&Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    capacity: i32,
) -> bool {
    let capacity = capacity.max(1) as usize;
    if overlapping.len() < capacity {
        return false;
    }

    let mut boundaries: Vec<DateTime<Utc>> = vec![start];
    boundaries.extend(
        overlapping
            .iter()
            .filter(|b| b.start_time > start && b.start_time < end)
            .map(|b| b.start_time),
    );

    boundaries.into_iter().any(|t| {
        let occupied = overlapping
            .iter()
            .filter(|b| b.start_time <= t && b.end_time > t)
            .count();
        occupied + 1 > capacity
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use shared::models::{BookingStatus, PaymentStatus};

    fn ts(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            resource_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
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
    fn nested_interval_conflicts() {
        let existing = [booking(ts(9, 0), ts(11, 0), BookingStatus::Pending)];
        let hits = conflicting(&existing, ts(9, 30), ts(10, 30), None);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        let existing = [booking(ts(9, 0), ts(10, 0), BookingStatus::Confirmed)];
        assert!(conflicting(&existing, ts(10, 0), ts(11, 0), None).is_empty());
        assert!(conflicting(&existing, ts(8, 0), ts(9, 0), None).is_empty());
    }

    #[test]
    fn inactive_statuses_never_conflict() {
        let existing = [
            booking(ts(9, 0), ts(11, 0), BookingStatus::Cancelled),
            booking(ts(9, 0), ts(11, 0), BookingStatus::Rejected),
            booking(ts(9, 0), ts(11, 0), BookingStatus::Completed),
        ];
        assert!(conflicting(&existing, ts(9, 0), ts(11, 0), None).is_empty());
    }

    #[test]
    fn excluded_booking_is_ignored() {
        let existing = [booking(ts(9, 0), ts(11, 0), BookingStatus::Pending)];
        let hits = conflicting(&existing, ts(9, 0), ts(11, 0), Some(existing[0].id));
        assert!(hits.is_empty());
    }

    #[test]
    fn capacity_one_rejects_any_overlap() {
        let existing = [booking(ts(9, 0), ts(10, 0), BookingStatus::Pending)];
        let hits = conflicting(&existing, ts(9, 30), ts(10, 30), None);
        assert!(exceeds_capacity(&hits, ts(9, 30), ts(10, 30), 1));
    }

    #[test]
    fn capacity_two_admits_one_overlap() {
        let existing = [booking(ts(9, 0), ts(10, 0), BookingStatus::Pending)];
        let hits = conflicting(&existing, ts(9, 0), ts(10, 0), None);
        assert!(!exceeds_capacity(&hits, ts(9, 0), ts(10, 0), 2));
    }

    #[test]
    fn staggered_overlaps_below_capacity_pass() {
        // Two bookings overlap the candidate but never each other, so peak
        // occupancy with the candidate is 2
        let existing = [
            booking(ts(9, 0), ts(10, 0), BookingStatus::Confirmed),
            booking(ts(10, 0), ts(11, 0), BookingStatus::Confirmed),
        ];
        let hits = conflicting(&existing, ts(9, 30), ts(10, 30), None);
        assert_eq!(hits.len(), 2);
        assert!(!exceeds_capacity(&hits, ts(9, 30), ts(10, 30), 2));
        assert!(exceeds_capacity(&hits, ts(9, 30), ts(10, 30), 1));
    }
}
