//! Villa Pay Engine
//!
//! The provider-agnostic core of the villa booking backend. It takes a booking from the website, records it, opens a
//! payment order for it, and settles the booking once the payment outcome is known.
//!
//! The library is divided into these sections:
//! 1. The backend interfaces ([`mod@traits`]). A payment gateway and a booking record store must implement these to be
//!    used by the engine. The engine never talks HTTP itself.
//! 2. The domain types ([`mod@booking_types`]) and input validation ([`mod@validation`]).
//! 3. The flows ([`PaymentFlowApi`]): checkout, payment verification and reconciliation. Every status change goes
//!    through the [`BookingLedger`], which enforces the status transition rules.
//!
//! The engine also emits events when a booking is confirmed or fails, and when a bookkeeping write could not be made.
//! See [`mod@events`] for how to subscribe to them.
pub mod booking_types;
pub mod events;
mod flow_api;
pub mod traits;
pub mod validation;

pub use flow_api::{
    side_effects::SIDE_EFFECT_LOG_TARGET,
    BookingLedger,
    CheckoutError,
    CheckoutResult,
    GatewayNotification,
    LedgerOutcome,
    NotificationOutcome,
    PaymentConfirmation,
    PaymentFlowApi,
    ReconciliationReport,
    VerificationError,
    VerificationResult,
};
