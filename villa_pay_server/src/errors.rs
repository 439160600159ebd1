use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use serde_json::{json, Value};
use thiserror::Error;
use villa_pay_engine::{validation::ValidationErrors, CheckoutError, VerificationError};

static EXPOSE_DEBUG_INFO: AtomicBool = AtomicBool::new(false);

/// When set, error responses carry a `debug` field with the `Debug` rendering of the error. Never set this in
/// production.
pub fn expose_debug_info(expose: bool) {
    EXPOSE_DEBUG_INFO.store(expose, Ordering::Relaxed);
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    ValidationFailed(ValidationErrors),
    #[error("Missing required fields: {}", .0.fields().join(", "))]
    MissingFields(ValidationErrors),
    #[error("Payment verification failed")]
    VerificationFailed,
    #[error("Webhook signature rejected. {0}")]
    InvalidSignature(String),
    #[error("Could not create the booking. {0}")]
    BookingCreationError(String),
    #[error("Could not create the payment order. {0}")]
    OrderCreationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    /// The `error` field of the response body. Internal details stay in `details`.
    fn summary(&self) -> String {
        match self {
            Self::InvalidRequestBody(_) => "Invalid request body".to_string(),
            Self::ValidationFailed(_) => "Validation failed".to_string(),
            Self::MissingFields(_) => self.to_string(),
            Self::VerificationFailed => self.to_string(),
            Self::InvalidSignature(_) => "Invalid webhook signature".to_string(),
            Self::BookingCreationError(_) => "Failed to create booking".to_string(),
            Self::OrderCreationError(_) => "Failed to create order".to_string(),
            Self::ConfigurationError(_) => "Server configuration error".to_string(),
            Self::InitializeError(_) | Self::IOError(_) | Self::Unspecified(_) => "Internal Server Error".to_string(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::ValidationFailed(e) | Self::MissingFields(e) => Some(json!(e.violations)),
            Self::InvalidRequestBody(s) |
            Self::InvalidSignature(s) |
            Self::BookingCreationError(s) |
            Self::OrderCreationError(s) |
            Self::ConfigurationError(s) => Some(json!(s)),
            _ => None,
        }
    }

    /// The JSON error body. `{success: false, error, details?, debug?}`
    pub fn response_body(&self, include_debug: bool) -> Value {
        let mut body = json!({ "success": false, "error": self.summary() });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        if include_debug {
            body["debug"] = json!(format!("{self:?}"));
        }
        body
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::VerificationFailed => StatusCode::BAD_REQUEST,
            Self::InvalidSignature(_) => StatusCode::FORBIDDEN,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BookingCreationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderCreationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ {self}");
        }
        let body = self.response_body(EXPOSE_DEBUG_INFO.load(Ordering::Relaxed));
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::Validation(e) => Self::ValidationFailed(e),
            CheckoutError::BookingCreation(e) => Self::BookingCreationError(e.to_string()),
            CheckoutError::Gateway(e) => Self::OrderCreationError(e.to_string()),
        }
    }
}

impl From<VerificationError> for ServerError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::Validation(e) => Self::MissingFields(e),
            VerificationError::InvalidInput(e) => Self::ValidationFailed(e),
            VerificationError::Configuration(e) => Self::ConfigurationError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use villa_pay_engine::{traits::GatewayError, validation::FieldViolation};

    use super::*;

    #[test]
    fn validation_errors_list_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("amount", "Amount is required");
        errors.push("villa", "Villa is required");
        let err = ServerError::from(CheckoutError::Validation(errors));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.response_body(false);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][1]["field"], "villa");
        assert_eq!(body["details"][1]["message"], "Villa is required");
        assert!(body.get("debug").is_none());
    }

    #[test]
    fn missing_fields_are_named() {
        let errors = ValidationErrors::from(FieldViolation::new("razorpay_signature", "Payment signature is required"));
        let err = ServerError::from(VerificationError::Validation(errors));
        assert_eq!(err.response_body(false)["error"], "Missing required fields: razorpay_signature");
    }

    #[test]
    fn debug_info_is_optional() {
        let err = ServerError::from(CheckoutError::Gateway(GatewayError::Transport("timed out".into())));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.response_body(true);
        assert_eq!(body["error"], "Failed to create order");
        assert_eq!(body["details"], "Could not reach the payment gateway: timed out");
        assert!(body["debug"].as_str().unwrap().contains("OrderCreationError"));
    }
}
