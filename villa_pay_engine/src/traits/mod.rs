//! # Backend interfaces
//!
//! The booking flows talk to two external systems, and each is hidden behind a trait so that the flows can be tested
//! against doubles and the backends can be swapped:
//!
//! * [`PaymentGateway`] creates orders and checks payment signatures.
//! * [`BookingStore`] persists booking records and their status.
mod booking_store;
mod payment_gateway;

pub use booking_store::{BookingStore, StoreError};
pub use payment_gateway::{GatewayError, PaymentGateway};
