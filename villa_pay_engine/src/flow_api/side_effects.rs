//! Bookkeeping writes that must never change the outcome a caller sees.
//!
//! Once a payment outcome has been decided (or an error is already on its way back to the client), any follow-up
//! write to the record store goes through [`PaymentFlowApi::record_side_effect`]. A failure is logged on the
//! `vp::side_effects` target and published as a [`SideEffectFailedEvent`] so that the record can be fixed up later.
use chrono::Utc;
use log::*;

use crate::{
    booking_types::{BookingId, StatusUpdate},
    events::SideEffectFailedEvent,
    flow_api::{booking_ledger::LedgerOutcome, PaymentFlowApi},
    traits::BookingStore,
};

pub const SIDE_EFFECT_LOG_TARGET: &str = "vp::side_effects";

impl<G, S> PaymentFlowApi<G, S>
where S: BookingStore
{
    /// Applies `update` to the booking. Returns `None` if the write failed.
    pub async fn record_side_effect(
        &self,
        booking_id: &BookingId,
        update: StatusUpdate,
        context: &str,
    ) -> Option<LedgerOutcome> {
        match self.ledger.apply(booking_id, &update).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(
                    target: SIDE_EFFECT_LOG_TARGET,
                    "booking={booking_id} status={} order={} payment={} context=\"{context}\" error=\"{e}\"",
                    update.status,
                    update.gateway_order_id.as_deref().unwrap_or("-"),
                    update.gateway_payment_id.as_deref().unwrap_or("-"),
                );
                let event = SideEffectFailedEvent {
                    booking_id: booking_id.clone(),
                    attempted: update,
                    context: context.to_string(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                };
                self.producers.publish_side_effect_failed(event).await;
                None
            },
        }
    }
}
