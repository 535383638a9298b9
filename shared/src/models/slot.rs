//! Availability read-path output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bookable window returned by the availability read path.
///
/// `capacity_available` is set for slot-based resources and absent for
/// duration-based free blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity_available: Option<i32>,
}
