//! Booking store interface
//!
//! Bookings are the one entity that needs more than CRUD: range queries for
//! conflict detection and the exclusive-lock primitive the lifecycle
//! manager serializes its check-then-write sequences on.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::models::Booking;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use super::RepoResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Booking>>;
    async fn find_by_customer(&self, customer_id: Uuid) -> RepoResult<Vec<Booking>>;
    async fn find_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Booking>>;

    /// Active (PENDING or CONFIRMED) bookings of a resource overlapping the
    /// half-open range `[start, end)`, optionally excluding one booking
    /// (the one being rescheduled), sorted by start time
    async fn find_active_overlapping(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> RepoResult<Vec<Booking>>;

    /// Active bookings of a resource starting on the given UTC calendar day
    async fn count_active_on_day(&self, resource_id: Uuid, day: NaiveDate) -> RepoResult<u32>;

    /// Active bookings a customer holds on a resource
    async fn count_active_for_customer(
        &self,
        resource_id: Uuid,
        customer_id: Uuid,
    ) -> RepoResult<u32>;

    /// Persist a new booking row built by the lifecycle manager
    async fn insert(&self, booking: Booking) -> RepoResult<Booking>;

    /// Replace an existing booking row
    async fn save(&self, booking: Booking) -> RepoResult<Booking>;

    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Exclusive lock over a resource's booking set. Held across
    /// conflict-check → price-resolve → write so two concurrent creates on
    /// the same resource serialize.
    async fn lock_resource(&self, resource_id: Uuid) -> RepoResult<OwnedMutexGuard<()>>;

    /// Exclusive row lock for status and payment transitions
    async fn lock_row(&self, booking_id: Uuid) -> RepoResult<OwnedMutexGuard<()>>;
}
