//! Booking Lifecycle Manager
//!
//! Owns the booking state machine and the conflict-check → price-resolve →
//! write sequence. Every mutation runs under the store's lock primitive so
//! concurrent attempts on the same resource or booking serialize:
//!
//! ```text
//! create_booking(actor, input)
//!     ├─ 1. Validate input (no store access yet)
//!     ├─ 2. Acquire resource lock
//!     ├─ 3. Load resource, require active
//!     ├─ 4. Conflict check against active bookings (capacity-aware)
//!     ├─ 5. Per-day / per-customer cap check
//!     ├─ 6. Resolve pricing rule, compute total
//!     ├─ 7. Persist PENDING booking, payment PENDING
//!     └─ 8. Release lock (guard drop)
//! ```
//!
//! Any failure before step 7 leaves no state behind.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::error::LimitScope;
use shared::models::{
    Booking, BookingCreate, BookingStatus, BookingUpdate, PaymentStatus, RecurringBookingCreate,
    RecurringBookingResult, Resource,
};
use shared::types::{DayOfWeek, Principal};
use shared::{AppError, AppResult};
use uuid::Uuid;
use validator::Validate;

use super::conflict;
use crate::clock::Clock;
use crate::db::repository::{BookingRepository, ResourceRepository};
use crate::pricing::PricingResolver;

#[derive(Clone)]
pub struct BookingManager {
    resources: Arc<dyn ResourceRepository>,
    bookings: Arc<dyn BookingRepository>,
    pricing: PricingResolver,
    clock: Arc<dyn Clock>,
}

impl BookingManager {
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        bookings: Arc<dyn BookingRepository>,
        pricing: PricingResolver,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resources,
            bookings,
            pricing,
            clock,
        }
    }

    /// Create a booking for the acting customer
    pub async fn create_booking(
        &self,
        actor: &Principal,
        input: BookingCreate,
    ) -> AppResult<Booking> {
        input
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.create_interval(
            actor,
            input.resource_id,
            input.start_time,
            input.end_time,
            input.notes,
            None,
        )
        .await
    }

    /// One occurrence per matching weekday over the template's date range.
    ///
    /// Occurrences that conflict or lack pricing are skipped, not fatal;
    /// successors link to the first created booking of the series.
    pub async fn create_recurring(
        &self,
        actor: &Principal,
        input: RecurringBookingCreate,
    ) -> AppResult<RecurringBookingResult> {
        input
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if input.end_date < input.start_date {
            return Err(AppError::validation(
                "end_date must not be before start_date",
            ));
        }
        if input.end_time_of_day <= input.start_time_of_day {
            return Err(AppError::validation(
                "end_time_of_day must be after start_time_of_day",
            ));
        }

        let mut booking_ids = Vec::new();
        let mut skipped_dates = Vec::new();
        let mut total_price = Decimal::ZERO;
        let mut parent: Option<Uuid> = None;

        for date in input
            .start_date
            .iter_days()
            .take_while(|d| *d <= input.end_date)
        {
            if DayOfWeek::from(date.weekday()) != input.day_of_week {
                continue;
            }
            let start = Utc.from_utc_datetime(&date.and_time(input.start_time_of_day));
            let end = Utc.from_utc_datetime(&date.and_time(input.end_time_of_day));

            match self
                .create_interval(
                    actor,
                    input.resource_id,
                    start,
                    end,
                    input.notes.clone(),
                    parent,
                )
                .await
            {
                Ok(booking) => {
                    parent.get_or_insert(booking.id);
                    total_price += booking.total_price;
                    booking_ids.push(booking.id);
                }
                Err(
                    err @ (AppError::Conflict { .. }
                    | AppError::PricingNotFound { .. }
                    | AppError::LimitExceeded { .. }),
                ) => {
                    tracing::warn!(date = %date, error = %err, "recurring occurrence skipped");
                    skipped_dates.push(date);
                }
                Err(other) => return Err(other),
            }
        }

        if booking_ids.is_empty() {
            return Err(AppError::not_found("bookable occurrence"));
        }

        Ok(RecurringBookingResult {
            created_count: booking_ids.len(),
            total_price,
            booking_ids,
            skipped_dates,
        })
    }

    /// Reschedule and/or annotate a booking.
    ///
    /// A new interval re-runs conflict detection (excluding this booking)
    /// and pricing before anything is committed; a rejected update leaves
    /// the stored booking untouched.
    pub async fn update_booking(
        &self,
        actor: &Principal,
        booking_id: Uuid,
        update: BookingUpdate,
    ) -> AppResult<Booking> {
        // Peek for the resource id; authoritative state is re-read under lock
        let peek = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking"))?;

        let _resource_guard = self.bookings.lock_resource(peek.resource_id).await?;
        let _row_guard = self.bookings.lock_row(booking_id).await?;

        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking"))?;

        if !actor.is_admin() && actor.id != booking.customer_id && actor.id != booking.owner_id {
            return Err(AppError::authorization(
                "only the customer or the resource owner may update a booking",
            ));
        }

        if update.start_time.is_some() || update.end_time.is_some() {
            if booking.status.is_terminal() {
                return Err(AppError::validation(format!(
                    "cannot reschedule a {} booking",
                    booking.status
                )));
            }
            let new_start = update.start_time.unwrap_or(booking.start_time);
            let new_end = update.end_time.unwrap_or(booking.end_time);
            if new_end <= new_start {
                return Err(AppError::validation("end_time must be after start_time"));
            }

            let resource = self
                .resources
                .find_by_id(booking.resource_id)
                .await?
                .ok_or_else(|| AppError::not_found("resource"))?;

            self.check_conflicts(&resource, new_start, new_end, Some(booking.id))
                .await?;
            let (rule, total) = self
                .pricing
                .quote(resource.id, new_start, new_end)
                .await?;

            tracing::info!(
                booking_id = %booking.id,
                rule_id = %rule.id,
                total = %total,
                "booking rescheduled"
            );
            booking.start_time = new_start;
            booking.end_time = new_end;
            booking.total_price = total;
        }

        if let Some(notes) = update.notes {
            booking.notes = Some(notes);
        }
        booking.updated_at = self.clock.now();
        Ok(self.bookings.save(booking).await?)
    }

    /// Drive the booking state machine.
    ///
    /// Owners confirm, reject and complete; the customer may cancel their
    /// own booking. Terminal states admit nothing, so cancelling an already
    /// cancelled booking fails instead of silently succeeding.
    pub async fn transition_status(
        &self,
        actor: &Principal,
        booking_id: Uuid,
        target: BookingStatus,
    ) -> AppResult<Booking> {
        let _guard = self.bookings.lock_row(booking_id).await?;

        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking"))?;

        self.authorize_transition(actor, &booking, target)?;

        if !booking.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }
        if target == BookingStatus::Completed && self.clock.now() < booking.end_time {
            return Err(AppError::validation(
                "booking window has not elapsed yet",
            ));
        }

        let from = booking.status;
        booking.status = target;
        booking.updated_at = self.clock.now();
        let saved = self.bookings.save(booking).await?;

        tracing::info!(booking_id = %booking_id, %from, to = %target, "booking status changed");
        Ok(saved)
    }

    fn authorize_transition(
        &self,
        actor: &Principal,
        booking: &Booking,
        target: BookingStatus,
    ) -> AppResult<()> {
        if actor.is_admin() {
            return Ok(());
        }
        let is_owner = actor.id == booking.owner_id;
        let is_customer = actor.id == booking.customer_id;
        let allowed = match target {
            BookingStatus::Cancelled => is_owner || is_customer,
            BookingStatus::Confirmed | BookingStatus::Rejected | BookingStatus::Completed => {
                is_owner
            }
            BookingStatus::Pending => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "actor may not move booking {} to {}",
                booking.id, target
            )))
        }
    }

    async fn create_interval(
        &self,
        actor: &Principal,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notes: Option<String>,
        parent_booking_id: Option<Uuid>,
    ) -> AppResult<Booking> {
        if end <= start {
            return Err(AppError::validation("end_time must be after start_time"));
        }

        let _guard = self.bookings.lock_resource(resource_id).await?;

        let resource = self
            .resources
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("resource"))?;
        if !resource.is_active {
            return Err(AppError::validation("resource is not accepting bookings"));
        }

        self.check_conflicts(&resource, start, end, None).await?;
        self.check_booking_caps(&resource, actor.id, start.date_naive())
            .await?;

        let (rule, total_price) = self.pricing.quote(resource.id, start, end).await?;

        let now = self.clock.now();
        let booking = Booking {
            id: Uuid::new_v4(),
            resource_id: resource.id,
            customer_id: actor.id,
            owner_id: resource.owner_id,
            start_time: start,
            end_time: end,
            total_price,
            deposit_amount: None,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            parent_booking_id,
            notes,
            created_at: now,
            updated_at: now,
        };
        let booking = self.bookings.insert(booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            resource_id = %resource.id,
            customer_id = %actor.id,
            rule_id = %rule.id,
            total = %booking.total_price,
            "booking created"
        );
        Ok(booking)
    }

    async fn check_conflicts(
        &self,
        resource: &Resource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = self
            .bookings
            .find_active_overlapping(resource.id, start, end, exclude)
            .await?;
        let overlapping = conflict::conflicting(&existing, start, end, exclude);
        if conflict::exceeds_capacity(&overlapping, start, end, resource.effective_capacity()) {
            return Err(AppError::Conflict {
                resource_id: resource.id,
                start_time: start,
                end_time: end,
                conflicts: overlapping.len(),
            });
        }
        Ok(())
    }

    async fn check_booking_caps(
        &self,
        resource: &Resource,
        customer_id: Uuid,
        day: NaiveDate,
    ) -> AppResult<()> {
        if let Some(limit) = resource.max_bookings_per_day {
            let count = self.bookings.count_active_on_day(resource.id, day).await?;
            if count >= limit {
                return Err(AppError::LimitExceeded {
                    resource_id: resource.id,
                    limit,
                    scope: LimitScope::PerDay,
                });
            }
        }
        if let Some(limit) = resource.max_bookings_per_customer {
            let count = self
                .bookings
                .count_active_for_customer(resource.id, customer_id)
                .await?;
            if count >= limit {
                return Err(AppError::LimitExceeded {
                    resource_id: resource.id,
                    limit,
                    scope: LimitScope::PerCustomer,
                });
            }
        }
        Ok(())
    }
}
