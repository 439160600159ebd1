//! Request and response bodies for the HTTP API.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use villa_pay_engine::{
    booking_types::BookingId,
    validation::{AmountInput, BookingDetails, CheckoutInput},
    CheckoutResult,
    PaymentConfirmation,
    VerificationResult,
};

//----------------------------------------------   Create order  ----------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Accepted for compatibility with older clients. The gateway generates its own receipt id.
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<BookingDetails>,
}

impl From<CreateOrderRequest> for CheckoutInput {
    fn from(req: CreateOrderRequest) -> Self {
        CheckoutInput { amount: req.amount, currency: req.currency, booking: req.notes.unwrap_or_default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    /// In minor currency units
    pub amount: i64,
    pub currency: String,
    pub booking_id: BookingId,
}

impl From<CheckoutResult> for CreateOrderResponse {
    fn from(result: CheckoutResult) -> Self {
        Self {
            success: true,
            order_id: result.order.id,
            amount: result.order.amount.value(),
            currency: result.order.currency,
            booking_id: result.booking.id,
        }
    }
}

//----------------------------------------------   Verify payment  --------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
    #[serde(default, rename = "bookingId")]
    pub booking_id: Option<String>,
}

impl From<VerifyPaymentRequest> for PaymentConfirmation {
    fn from(req: VerifyPaymentRequest) -> Self {
        PaymentConfirmation {
            order_id: req.razorpay_order_id,
            payment_id: req.razorpay_payment_id,
            signature: req.razorpay_signature,
            booking_id: req.booking_id.map(BookingId::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment_id: String,
    pub order_id: String,
    pub booking_id: Option<BookingId>,
}

impl From<VerificationResult> for VerifyPaymentResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            success: result.verified,
            message: "Payment verified successfully".to_string(),
            payment_id: result.payment_id,
            order_id: result.order_id,
            booking_id: result.booking_id,
        }
    }
}

//----------------------------------------------   Misc  ------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string(), timestamp: Utc::now() }
    }
}
