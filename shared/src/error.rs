//! Unified error type for the booking core
//!
//! Every operation returns [`AppResult`]; the (external) transport layer
//! maps variants to protocol responses. Conflict and pricing errors carry
//! the resource id and requested interval so the caller can render an
//! actionable message; store errors stay generic so storage details never
//! leak past the log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::BookingStatus;

/// Which booking cap was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    PerDay,
    PerCustomer,
}

impl std::fmt::Display for LimitScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitScope::PerDay => write!(f, "per-day"),
            LimitScope::PerCustomer => write!(f, "per-customer"),
        }
    }
}

/// Unified error type for the booking engine
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, rejected before any store access
    #[error("{message}")]
    Validation { message: String },

    /// Candidate interval overlaps active bookings beyond capacity
    #[error(
        "requested range {start_time}..{end_time} on resource {resource_id} \
         overlaps {conflicts} active booking(s)"
    )]
    Conflict {
        resource_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        conflicts: usize,
    },

    /// No pricing rule applies; the booking is refused, never priced at zero
    #[error("no applicable pricing rule for resource {resource_id} between {start_time} and {end_time}")]
    PricingNotFound {
        resource_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },

    /// Actor lacks ownership/role for the target operation
    #[error("permission denied: {message}")]
    Authorization { message: String },

    /// Requested status change is not reachable from the current state
    #[error("invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Payment amount does not match the booking total
    #[error("payment amount {provided} does not match booking total {expected}")]
    AmountMismatch { expected: Decimal, provided: Decimal },

    /// A successful payment already exists for the booking
    #[error("booking {booking_id} is already paid")]
    AlreadyPaid { booking_id: Uuid },

    /// A per-day or per-customer booking cap was reached
    #[error("{scope} booking limit of {limit} reached for resource {resource_id}")]
    LimitExceeded {
        resource_id: Uuid,
        limit: u32,
        scope: LimitScope,
    },

    /// Target record does not exist (or is invisible to the tenant)
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Underlying persistence failure; the operation was rolled back
    #[error("store error: {message}")]
    Store { message: String },
}

impl AppError {
    // ========== Convenient constructors ==========

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        AppError::Authorization {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        AppError::Store {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation can succeed without input changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Store { .. })
    }
}

/// Result type for engine operations
pub type AppResult<T> = Result<T, AppError>;
