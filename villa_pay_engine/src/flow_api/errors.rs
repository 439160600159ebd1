use thiserror::Error;

use crate::{
    traits::{GatewayError, StoreError},
    validation::ValidationErrors,
};

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    /// Nothing was sent to the payment gateway.
    #[error("Failed to create booking record. {0}")]
    BookingCreation(StoreError),
    /// The booking record exists and has been marked as failed (best-effort).
    #[error("Failed to create order. {0}")]
    Gateway(GatewayError),
}

#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    InvalidInput(ValidationErrors),
    #[error("Payment could not be verified. {0}")]
    Configuration(GatewayError),
}
