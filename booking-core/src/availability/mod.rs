//! Availability read path
//!
//! Customers query what is bookable before submitting a request. The engine
//! itself is pure ([`engine`], [`interval`]); [`AvailabilityService`] loads
//! the rules and active bookings and dispatches on the resource's booking
//! mode.

pub mod engine;
pub mod interval;

pub use engine::{FreeBlock, Slot};

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use shared::models::{AvailableSlot, BookingType};
use shared::{AppError, AppResult};
use uuid::Uuid;

use crate::config::Config;
use crate::db::repository::{AvailabilityRuleRepository, BookingRepository, ResourceRepository};

#[derive(Clone)]
pub struct AvailabilityService {
    resources: Arc<dyn ResourceRepository>,
    rules: Arc<dyn AvailabilityRuleRepository>,
    bookings: Arc<dyn BookingRepository>,
    slot_minutes: u32,
}

impl AvailabilityService {
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        rules: Arc<dyn AvailabilityRuleRepository>,
        bookings: Arc<dyn BookingRepository>,
        config: &Config,
    ) -> Self {
        Self {
            resources,
            rules,
            bookings,
            slot_minutes: config.slot_duration_minutes,
        }
    }

    /// Free windows of a resource over an inclusive date range.
    ///
    /// Slot-based resources report per-slot remaining capacity;
    /// duration-based resources report open blocks without capacity.
    pub async fn get_available_slots(
        &self,
        resource_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<AvailableSlot>> {
        if start_date > end_date {
            return Err(AppError::validation(
                "start_date must not be after end_date",
            ));
        }

        let resource = self
            .resources
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("resource"))?;

        let rules = self.rules.find_by_resource(resource_id).await?;

        let range_start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
        let day_after_end = end_date.succ_opt().unwrap_or(NaiveDate::MAX);
        let range_end = Utc.from_utc_datetime(&day_after_end.and_time(NaiveTime::MIN));
        let bookings = self
            .bookings
            .find_active_overlapping(resource_id, range_start, range_end, None)
            .await?;

        tracing::debug!(
            resource_id = %resource_id,
            rules = rules.len(),
            active_bookings = bookings.len(),
            "computing availability"
        );

        let slots = match resource.booking_type {
            BookingType::SlotBased => engine::compute_slots(
                &resource,
                &rules,
                &bookings,
                start_date,
                end_date,
                self.slot_minutes,
            )
            .into_iter()
            .map(|s| AvailableSlot {
                start_time: s.start_time,
                end_time: s.end_time,
                capacity_available: Some(s.capacity_available),
            })
            .collect(),
            BookingType::DurationBased => {
                engine::compute_free_blocks(&rules, &bookings, start_date, end_date)
                    .into_iter()
                    .map(|b| AvailableSlot {
                        start_time: b.start_time,
                        end_time: b.end_time,
                        capacity_available: None,
                    })
                    .collect()
            }
        };

        Ok(slots)
    }
}
