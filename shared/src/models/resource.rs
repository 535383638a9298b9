//! Resource Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Booking mode enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    /// Fixed slots (e.g. 14:00, 14:30, 15:00)
    SlotBased,
    /// Flexible start and length (e.g. start 14:21, run 3 hours)
    DurationBased,
}

/// Bookable resource entity (service or space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Simultaneous bookings the resource can hold; absent = one exclusive unit
    pub capacity: Option<i32>,
    pub booking_type: BookingType,
    pub is_active: bool,
    /// Cap on bookings accepted per calendar day
    pub max_bookings_per_day: Option<u32>,
    /// Cap on active bookings a single customer may hold
    pub max_bookings_per_customer: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Capacity used by conflict detection and slot accounting.
    /// An absent capacity reads as a single exclusive unit.
    pub fn effective_capacity(&self) -> i32 {
        self.capacity.unwrap_or(1).max(1)
    }
}

/// Create resource payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResourceCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub booking_type: BookingType,
    pub max_bookings_per_day: Option<u32>,
    pub max_bookings_per_customer: Option<u32>,
}

/// Update resource payload; only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub booking_type: Option<BookingType>,
    pub is_active: Option<bool>,
    pub max_bookings_per_day: Option<u32>,
    pub max_bookings_per_customer: Option<u32>,
}
