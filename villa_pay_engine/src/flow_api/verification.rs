use log::*;

use crate::{
    booking_types::{BookingId, BookingStatus, StatusUpdate},
    events::{BookingConfirmedEvent, BookingFailedEvent, OutcomeSource},
    flow_api::{booking_ledger::LedgerOutcome, PaymentFlowApi, VerificationError},
    traits::{BookingStore, PaymentGateway},
    validation::ValidationErrors,
};

/// What the client reports after the gateway's checkout widget closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub booking_id: Option<BookingId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// True if the signature matched. The booking update is best-effort and does not affect this.
    pub verified: bool,
    pub order_id: String,
    pub payment_id: String,
    pub booking_id: Option<BookingId>,
    /// `None` if there was no booking to update, or the update failed.
    pub booking_update: Option<LedgerOutcome>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl<G, S> PaymentFlowApi<G, S>
where
    G: PaymentGateway,
    S: BookingStore,
{
    /// Verifies a payment reported by the client and settles the booking.
    ///
    /// * A matching signature always yields a verified result, even if the booking cannot be updated.
    /// * A mismatch marks the booking as failed (best-effort) and yields an unverified result.
    /// * If the signature cannot be checked at all, the booking is marked as failed (best-effort) and the error is
    ///   returned.
    pub async fn verify_and_confirm(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerificationResult, VerificationError> {
        let mut errors = ValidationErrors::default();
        let payment_id = non_empty(&confirmation.payment_id);
        let order_id = non_empty(&confirmation.order_id);
        let signature = non_empty(&confirmation.signature);
        if payment_id.is_none() {
            errors.push("razorpay_payment_id", "Payment id is required");
        }
        if order_id.is_none() {
            errors.push("razorpay_order_id", "Order id is required");
        }
        if signature.is_none() {
            errors.push("razorpay_signature", "Payment signature is required");
        }
        let (Some(payment_id), Some(order_id), Some(signature)) = (payment_id, order_id, signature) else {
            return Err(VerificationError::Validation(errors));
        };
        let booking_id = confirmation.booking_id.clone().filter(|b| !b.as_str().trim().is_empty());
        if let Some(id) = booking_id.as_ref().filter(|id| !id.is_well_formed()) {
            debug!("🔄️ Rejecting verification of {order_id} for malformed booking id {id:?}");
            errors.push("bookingId", "Booking id is not a valid record id");
            return Err(VerificationError::InvalidInput(errors));
        }
        trace!("🔄️ Verifying payment {payment_id} for order {order_id}");
        let verified = match self.gateway.verify_signature(order_id, payment_id, signature) {
            Ok(v) => v,
            Err(e) => {
                error!("🔄️ Payment {payment_id} for order {order_id} could not be verified. {e}");
                if let Some(id) = &booking_id {
                    let update = StatusUpdate::new(BookingStatus::Failed).with_order_id(order_id);
                    self.record_side_effect(id, update, "signature check errored").await;
                }
                return Err(VerificationError::Configuration(e));
            },
        };
        let mut result = VerificationResult {
            verified,
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            booking_id: booking_id.clone(),
            booking_update: None,
        };
        if verified {
            info!("🔄️ Payment {payment_id} for order {order_id} verified ✅️");
            let booking_id = match booking_id {
                Some(id) => Some(id),
                None => self.booking_id_for_order(order_id).await,
            };
            if let Some(id) = &booking_id {
                let update =
                    StatusUpdate::new(BookingStatus::Completed).with_order_id(order_id).with_payment_id(payment_id);
                result.booking_update = self.record_side_effect(id, update, "verified payment").await;
            } else {
                warn!("🔄️ Payment {payment_id} was verified, but no booking is linked to order {order_id}");
            }
            result.booking_id = booking_id.clone();
            let event = BookingConfirmedEvent {
                booking_id,
                order_id: order_id.to_string(),
                payment_id: payment_id.to_string(),
                source: OutcomeSource::Checkout,
            };
            self.producers.publish_booking_confirmed(event).await;
        } else {
            warn!("🔄️ Signature mismatch for payment {payment_id} on order {order_id} ❌️");
            if let Some(id) = &booking_id {
                let update = StatusUpdate::new(BookingStatus::Failed).with_order_id(order_id);
                result.booking_update = self.record_side_effect(id, update, "signature mismatch").await;
            }
            let event = BookingFailedEvent {
                booking_id,
                order_id: Some(order_id.to_string()),
                reason: "Payment signature mismatch".to_string(),
                source: OutcomeSource::Checkout,
            };
            self.producers.publish_booking_failed(event).await;
        }
        Ok(result)
    }
}
