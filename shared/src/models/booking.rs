//! Booking Model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::DayOfWeek;

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl BookingStatus {
    /// Statuses that occupy the calendar for conflict purposes
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Terminal states admit no further transition
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::Rejected
        )
    }

    /// The booking state machine, one edge per legal transition
    pub fn can_transition_to(self, target: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Rejected => "REJECTED",
        };
        write!(f, "{name}")
    }
}

/// Payment status, tracked independently on the same record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::Failed => "FAILED",
        };
        write!(f, "{name}")
    }
}

/// Booking entity
///
/// The interval is half-open `[start_time, end_time)` in UTC. Status and
/// payment status are mutated only by the lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub customer_id: Uuid,
    /// Denormalized from the resource for tenant-scoped queries
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Fixed-point, 2 decimal places, rounded up
    pub total_price: Decimal,
    pub deposit_amount: Option<Decimal>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// First booking of the recurring series this one belongs to
    pub parent_booking_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    pub resource_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Update booking payload; only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Recurring series template: one occurrence per matching weekday
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecurringBookingCreate {
    pub resource_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time_of_day: NaiveTime,
    pub end_time_of_day: NaiveTime,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Outcome of a recurring expansion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringBookingResult {
    pub created_count: usize,
    pub total_price: Decimal,
    pub booking_ids: Vec<Uuid>,
    /// Occurrences skipped over a conflict or missing pricing
    pub skipped_dates: Vec<NaiveDate>,
}
