//! Payment Processor
//!
//! Booking and payment are separate records with independent timestamps,
//! kept in sync here. Every status sequence runs under the booking's row
//! lock, so two concurrent payment attempts (or a payment racing a
//! cancellation) cannot double-confirm or leave a paid-but-cancelled row.

use std::sync::Arc;

use shared::models::{
    Booking, BookingStatus, Payment, PaymentInitiateRequest, PaymentResult, PaymentStatus,
    WebhookEvent, WebhookOutcome,
};
use shared::types::Principal;
use shared::{AppError, AppResult};
use uuid::Uuid;
use validator::Validate;

use super::gateway::MockGateway;
use crate::clock::Clock;
use crate::db::repository::{BookingRepository, PaymentRepository};

#[derive(Clone)]
pub struct PaymentProcessor {
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: MockGateway,
    clock: Arc<dyn Clock>,
}

impl PaymentProcessor {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: MockGateway,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            payments,
            gateway,
            clock,
        }
    }

    /// Charge the booking total and synchronize both records.
    ///
    /// The row lock spans validation through the final write; an amount
    /// mismatch or ineligible booking leaves every record untouched.
    pub async fn initiate_payment(
        &self,
        actor: &Principal,
        req: PaymentInitiateRequest,
    ) -> AppResult<PaymentResult> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let _guard = self.bookings.lock_row(req.booking_id).await?;

        let booking = self
            .bookings
            .find_by_id(req.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking"))?;

        if !actor.is_admin() && actor.id != booking.customer_id {
            return Err(AppError::authorization(
                "only the booking's customer may pay for it",
            ));
        }
        if booking.payment_status == PaymentStatus::Paid {
            return Err(AppError::AlreadyPaid {
                booking_id: booking.id,
            });
        }
        if matches!(
            booking.status,
            BookingStatus::Cancelled | BookingStatus::Rejected
        ) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Confirmed,
            });
        }
        if req.amount != booking.total_price {
            return Err(AppError::AmountMismatch {
                expected: booking.total_price,
                provided: req.amount,
            });
        }

        let outcome = self.gateway.charge(&req.instrument_fingerprint);
        let status = if outcome.approved {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };
        let now = self.clock.now();

        // One payment record per booking: update it when a previous attempt
        // left one behind
        let payment = match self.payments.find_by_booking(booking.id).await? {
            Some(mut existing) => {
                existing.status = status;
                existing.transaction_id = Some(outcome.transaction_id.clone());
                existing.is_successful = outcome.approved;
                existing.updated_at = now;
                self.payments.save(existing).await?
            }
            None => {
                self.payments
                    .insert(Payment {
                        id: Uuid::new_v4(),
                        booking_id: booking.id,
                        customer_id: actor.id,
                        amount: req.amount,
                        currency: req.currency.clone(),
                        status,
                        transaction_id: Some(outcome.transaction_id.clone()),
                        instrument_last_four: Some(req.instrument_fingerprint.clone()),
                        is_successful: outcome.approved,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
        };

        self.apply_outcome(booking, status, outcome.approved, now)
            .await?;

        tracing::info!(
            booking_id = %req.booking_id,
            transaction_id = %outcome.transaction_id,
            approved = outcome.approved,
            "payment processed"
        );

        Ok(PaymentResult {
            payment_id: payment.id,
            booking_id: req.booking_id,
            amount: req.amount,
            currency: req.currency,
            status,
            transaction_id: outcome.transaction_id,
            message: outcome.message,
        })
    }

    /// Replay a provider callback onto the booking and its payment record
    pub async fn handle_webhook(&self, event: WebhookEvent) -> AppResult<Booking> {
        let _guard = self.bookings.lock_row(event.booking_id).await?;

        let booking = self
            .bookings
            .find_by_id(event.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking"))?;

        let (status, approved) = match event.outcome {
            WebhookOutcome::PaymentSucceeded => (PaymentStatus::Paid, true),
            WebhookOutcome::PaymentFailed => (PaymentStatus::Failed, false),
        };
        let now = self.clock.now();

        if let Some(mut payment) = self.payments.find_by_booking(booking.id).await? {
            payment.status = status;
            payment.is_successful = approved;
            payment.transaction_id = Some(event.transaction_id.clone());
            payment.updated_at = now;
            self.payments.save(payment).await?;
        }

        let saved = self.apply_outcome(booking, status, approved, now).await?;

        tracing::info!(
            booking_id = %event.booking_id,
            transaction_id = %event.transaction_id,
            approved,
            "payment webhook processed"
        );
        Ok(saved)
    }

    /// Set the payment status and, for pending bookings, resolve the
    /// booking status from the payment outcome
    async fn apply_outcome(
        &self,
        mut booking: Booking,
        status: PaymentStatus,
        approved: bool,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Booking> {
        booking.payment_status = status;
        if booking.status == BookingStatus::Pending {
            booking.status = if approved {
                BookingStatus::Confirmed
            } else {
                BookingStatus::Rejected
            };
        }
        booking.updated_at = now;
        Ok(self.bookings.save(booking).await?)
    }
}
