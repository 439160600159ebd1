use log::*;

use crate::{
    booking_types::{BookingHandle, BookingStatus, GatewayOrder, StatusUpdate},
    events::{BookingFailedEvent, OutcomeSource},
    flow_api::{CheckoutError, PaymentFlowApi},
    traits::{BookingStore, PaymentGateway},
    validation::CheckoutInput,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutResult {
    pub order: GatewayOrder,
    pub booking: BookingHandle,
}

impl<G, S> PaymentFlowApi<G, S>
where
    G: PaymentGateway,
    S: BookingStore,
{
    /// Starts a checkout.
    ///
    /// The booking is written as `pending` *before* the gateway order is opened, so that every order the gateway
    /// knows about has a record. If the record cannot be written, the gateway is never called. If the gateway call
    /// fails, the record is marked as failed on a best-effort basis and the gateway's error is returned unchanged.
    pub async fn create_checkout(&self, input: &CheckoutInput) -> Result<CheckoutResult, CheckoutError> {
        let booking = input.validate()?;
        let handle = self.ledger.create(&booking).await.map_err(|e| {
            error!("🔄️ Could not record booking for {}. No order will be created. {e}", booking.customer_email);
            CheckoutError::BookingCreation(e)
        })?;
        trace!("🔄️ Opening gateway order for booking {}", handle.id);
        match self.gateway.create_order(booking.amount, &booking.currency, &handle.id).await {
            Ok(order) => {
                info!("🔄️ Order {} opened for booking {} ({} {})", order.id, handle.id, order.amount, order.currency);
                let update = StatusUpdate::new(BookingStatus::Pending).with_order_id(order.id.as_str());
                self.record_side_effect(&handle.id, update, "attach gateway order id").await;
                Ok(CheckoutResult { order, booking: handle })
            },
            Err(e) => {
                warn!("🔄️ Gateway order for booking {} could not be created. {e}", handle.id);
                self.record_side_effect(&handle.id, StatusUpdate::new(BookingStatus::Failed), "gateway order failed")
                    .await;
                let event = BookingFailedEvent {
                    booking_id: Some(handle.id.clone()),
                    order_id: None,
                    reason: e.to_string(),
                    source: OutcomeSource::Checkout,
                };
                self.producers.publish_booking_failed(event).await;
                Err(CheckoutError::Gateway(e))
            },
        }
    }
}
