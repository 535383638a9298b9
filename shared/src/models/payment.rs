//! Payment Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaymentStatus;

/// Payment entity; one active payment per booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub amount: Decimal,
    /// ISO 4217 code, e.g. "EUR"
    pub currency: String,
    pub status: PaymentStatus,
    /// Provider transaction id
    pub transaction_id: Option<String>,
    /// Masked instrument fingerprint (last four digits)
    pub instrument_last_four: Option<String>,
    pub is_successful: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Initiate payment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentInitiateRequest {
    pub booking_id: Uuid,
    pub amount: Decimal,
    #[validate(length(equal = 3))]
    pub currency: String,
    /// Masked instrument fingerprint (last four digits)
    #[validate(length(equal = 4))]
    pub instrument_fingerprint: String,
}

/// Initiate payment response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub payment_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub message: String,
}

/// Provider callback outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    PaymentSucceeded,
    PaymentFailed,
}

/// Provider callback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub transaction_id: String,
    pub booking_id: Uuid,
    pub outcome: WebhookOutcome,
}
