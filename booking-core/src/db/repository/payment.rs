//! Payment store interface

use async_trait::async_trait;
use shared::models::Payment;
use uuid::Uuid;

use super::RepoResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// The booking's payment record, if one exists (at most one per booking)
    async fn find_by_booking(&self, booking_id: Uuid) -> RepoResult<Option<Payment>>;
    async fn find_by_transaction(&self, transaction_id: &str) -> RepoResult<Option<Payment>>;
    /// Insert; rejects a second record for the same booking
    async fn insert(&self, payment: Payment) -> RepoResult<Payment>;
    async fn save(&self, payment: Payment) -> RepoResult<Payment>;
}
