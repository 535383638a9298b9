//! Repository Module
//!
//! Per-entity store interfaces. Read-mostly entities (resources, rules) are
//! plain CRUD; the booking interface additionally exposes the exclusive
//! lock primitive the lifecycle manager builds its transactions on.

pub mod availability_rule;
pub mod booking;
pub mod payment;
pub mod pricing_rule;
pub mod resource;

// Re-exports
pub use availability_rule::AvailabilityRuleRepository;
pub use booking::BookingRepository;
pub use payment::PaymentRepository;
pub use pricing_rule::PricingRuleRepository;
pub use resource::ResourceRepository;

use shared::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::NotFound { resource: what },
            RepoError::Validation(message) => AppError::Validation { message },
            RepoError::Duplicate(detail) | RepoError::Database(detail) => {
                // Full detail stays in the log; the caller gets a generic
                // store failure it may retry.
                tracing::error!(error = %detail, "store operation failed");
                AppError::store("storage operation failed")
            }
        }
    }
}
