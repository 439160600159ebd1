//! The booking and payment flows.
//!
//! [`PaymentFlowApi`] is generic over the [`crate::traits::PaymentGateway`] and [`crate::traits::BookingStore`]
//! backends. Its methods are split by flow:
//! * `checkout`: validate the booking, record it as pending, open a gateway order.
//! * `verification`: check the signature the client reports and settle the booking.
//! * `reconciliation`: settle bookings from gateway webhooks and a periodic sweep of pending bookings.
use std::fmt::Debug;

use crate::events::EventProducers;

pub mod booking_ledger;
mod checkout;
mod errors;
mod reconciliation;
pub mod side_effects;
mod verification;

pub use booking_ledger::{BookingLedger, LedgerOutcome};
pub use checkout::CheckoutResult;
pub use errors::{CheckoutError, VerificationError};
pub use reconciliation::{GatewayNotification, NotificationOutcome, ReconciliationReport};
pub use verification::{PaymentConfirmation, VerificationResult};

pub struct PaymentFlowApi<G, S> {
    gateway: G,
    ledger: BookingLedger<S>,
    producers: EventProducers,
}

impl<G, S> Debug for PaymentFlowApi<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<G, S> PaymentFlowApi<G, S> {
    pub fn new(gateway: G, store: S, producers: EventProducers) -> Self {
        Self { gateway, ledger: BookingLedger::new(store), producers }
    }
}
