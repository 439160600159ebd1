use thiserror::Error;
use vp_common::MinorUnits;

use crate::booking_types::{BookingId, GatewayOrder, GatewayPayment};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Payment gateway is not configured: {0}")]
    Configuration(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Payment gateway rejected the request. Error {status}. [{code}] {description}")]
    Remote { status: u16, code: String, description: String },
    #[error("Could not reach the payment gateway: {0}")]
    Transport(String),
}

/// The payment gateway, as seen by the booking flows.
///
/// Amounts are always in minor currency units. Implementations are constructed once, with validated credentials, and
/// shared between requests.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Opens an auto-captured order for `amount` with `booking_id` recorded in the order notes.
    ///
    /// Fails with [`GatewayError::InvalidAmount`] if the amount is not positive, and with
    /// [`GatewayError::Configuration`] if the credentials are absent.
    async fn create_order(
        &self,
        amount: MinorUnits,
        currency: &str,
        booking_id: &BookingId,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Checks the signature the gateway gave the client for `(order_id, payment_id)`.
    ///
    /// This is a pure computation. A mismatch, including a malformed signature, is `Ok(false)`. Only a missing secret
    /// is an error.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, GatewayError>;

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;

    /// The first captured payment against `order_id`, if there is one.
    async fn fetch_captured_payment(&self, order_id: &str) -> Result<Option<GatewayPayment>, GatewayError>;
}
