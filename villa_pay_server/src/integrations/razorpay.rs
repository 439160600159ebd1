use log::*;
use razorpay_tools::{RazorpayApi, RazorpayApiError, RazorpayConfig, RazorpayOrder, RazorpayPayment, WebhookEvent};
use villa_pay_engine::{
    booking_types::{BookingId, GatewayOrder, GatewayPayment},
    traits::{GatewayError, PaymentGateway},
    GatewayNotification,
};
use vp_common::MinorUnits;

/// The order note that links a Razorpay order to its booking.
pub const BOOKING_ID_NOTE: &str = "booking_id";

/// [`PaymentGateway`] backed by the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &RazorpayApi {
        &self.api
    }
}

fn gateway_error(e: RazorpayApiError) -> GatewayError {
    match e {
        RazorpayApiError::Configuration(s) | RazorpayApiError::Initialization(s) => GatewayError::Configuration(s),
        RazorpayApiError::InvalidAmount(s) => GatewayError::InvalidAmount(s),
        RazorpayApiError::QueryError { status, code, description } => {
            GatewayError::Remote { status, code, description }
        },
        RazorpayApiError::InvalidCurrency(s) => {
            GatewayError::Remote { status: 400, code: "BAD_REQUEST_ERROR".into(), description: s }
        },
        RazorpayApiError::RestRequestError(s) => GatewayError::Transport(s),
        e @ (RazorpayApiError::RestResponseError(_) | RazorpayApiError::JsonError(_)) => {
            GatewayError::Remote { status: 502, code: "BAD_RESPONSE".into(), description: e.to_string() }
        },
    }
}

fn gateway_order(order: RazorpayOrder) -> GatewayOrder {
    let booking_id = order.note(BOOKING_ID_NOTE).map(BookingId::from);
    GatewayOrder {
        id: order.id,
        amount: MinorUnits::from(order.amount),
        currency: order.currency,
        status: order.status,
        receipt: order.receipt,
        booking_id,
        created_at: order.created_at,
    }
}

fn gateway_payment(payment: RazorpayPayment, order_id: &str) -> GatewayPayment {
    GatewayPayment {
        id: payment.id,
        order_id: payment.order_id.unwrap_or_else(|| order_id.to_string()),
        amount: MinorUnits::from(payment.amount),
        currency: payment.currency,
        status: payment.status,
    }
}

impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount: MinorUnits,
        currency: &str,
        booking_id: &BookingId,
    ) -> Result<GatewayOrder, GatewayError> {
        let notes = [(BOOKING_ID_NOTE, booking_id.as_str())];
        let order = self.api.create_order(amount.value(), currency, &notes).await.map_err(gateway_error)?;
        Ok(gateway_order(order))
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, GatewayError> {
        self.api.verify_payment_signature(order_id, payment_id, signature).map_err(gateway_error)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let order = self.api.fetch_order(order_id).await.map_err(gateway_error)?;
        Ok(gateway_order(order))
    }

    async fn fetch_captured_payment(&self, order_id: &str) -> Result<Option<GatewayPayment>, GatewayError> {
        let payments = self.api.fetch_order_payments(order_id).await.map_err(gateway_error)?;
        let captured = payments.into_iter().find(|p| p.is_captured()).map(|p| gateway_payment(p, order_id));
        Ok(captured)
    }
}

/// Reduces a Razorpay webhook to the notification the booking flows act on.
///
/// * `order.paid` carries both the order (with its notes) and the payment.
/// * `payment.failed` only carries the payment. The booking is found from the order later.
pub fn notification_from_webhook(event: &WebhookEvent) -> GatewayNotification {
    match event.event.as_str() {
        "order.paid" => match (event.order(), event.payment()) {
            (Some(order), Some(payment)) => GatewayNotification::OrderPaid {
                order_id: order.id.clone(),
                payment_id: payment.id.clone(),
                booking_id: order.note(BOOKING_ID_NOTE).map(BookingId::from),
            },
            _ => {
                warn!("💳️ order.paid webhook is missing its order or payment entity");
                GatewayNotification::Other(event.event.clone())
            },
        },
        "payment.failed" => match event.payment() {
            Some(RazorpayPayment { id, order_id: Some(order_id), error_description, .. }) => {
                GatewayNotification::PaymentFailed {
                    order_id: order_id.clone(),
                    payment_id: id.clone(),
                    reason: error_description.clone().unwrap_or_else(|| "Payment failed".to_string()),
                }
            },
            _ => {
                warn!("💳️ payment.failed webhook does not reference an order");
                GatewayNotification::Other(event.event.clone())
            },
        },
        other => GatewayNotification::Other(other.to_string()),
    }
}
