//! Settling bookings without the client.
//!
//! There is no transaction spanning the gateway and the record store, so a booking can be left `pending` when a
//! client never reports back, or when a bookkeeping write fails. Two mechanisms close that gap:
//! * gateway webhooks, translated into [`GatewayNotification`]s by the server, and
//! * [`PaymentFlowApi::reconcile_pending`], run periodically over all pending bookings.
use chrono::{Duration, Utc};
use log::*;

use crate::{
    booking_types::{BookingId, BookingRecord, BookingStatus, StatusUpdate},
    events::{BookingConfirmedEvent, BookingFailedEvent, OutcomeSource},
    flow_api::{booking_ledger::LedgerOutcome, PaymentFlowApi},
    traits::{BookingStore, PaymentGateway, StoreError},
};

/// A gateway webhook, reduced to what the booking flows care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayNotification {
    /// The order has been paid in full.
    OrderPaid { order_id: String, payment_id: String, booking_id: Option<BookingId> },
    /// A payment attempt against the order failed. The customer may still retry and succeed.
    PaymentFailed { order_id: String, payment_id: String, reason: String },
    /// Any other event. The payload is the event name.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Completed(BookingId),
    Failed(BookingId),
    /// Nothing was changed. The reason is for the logs.
    Ignored(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub completed: Vec<BookingId>,
    pub failed: Vec<BookingId>,
    pub unchanged: Vec<BookingId>,
}

impl ReconciliationReport {
    pub fn total_count(&self) -> usize {
        self.completed.len() + self.failed.len() + self.unchanged.len()
    }

    pub fn changed_count(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

fn applied(outcome: Option<LedgerOutcome>) -> bool {
    matches!(outcome, Some(LedgerOutcome::Applied) | Some(LedgerOutcome::Unchanged))
}

impl<G, S> PaymentFlowApi<G, S>
where
    G: PaymentGateway,
    S: BookingStore,
{
    /// Looks up the booking an order was opened for, from the order notes.
    pub async fn booking_id_for_order(&self, order_id: &str) -> Option<BookingId> {
        match self.gateway.fetch_order(order_id).await {
            Ok(order) => {
                if order.booking_id.is_none() {
                    debug!("🔄️ Order {order_id} carries no booking id");
                }
                order.booking_id
            },
            Err(e) => {
                warn!("🔄️ Could not fetch order {order_id} to find its booking. {e}");
                None
            },
        }
    }

    /// Applies a gateway webhook. This never fails: problems are logged and reported as
    /// [`NotificationOutcome::Ignored`], so that the gateway is not asked to redeliver.
    pub async fn handle_notification(&self, notification: &GatewayNotification) -> NotificationOutcome {
        match notification {
            GatewayNotification::OrderPaid { order_id, payment_id, booking_id } => {
                let booking_id = match booking_id {
                    Some(id) => Some(id.clone()),
                    None => self.booking_id_for_order(order_id).await,
                };
                let Some(booking_id) = booking_id else {
                    return NotificationOutcome::Ignored(format!("No booking is linked to order {order_id}"));
                };
                info!("🔄️ Gateway reports order {order_id} paid by {payment_id}. Completing booking {booking_id}");
                let update = StatusUpdate::new(BookingStatus::Completed)
                    .with_order_id(order_id.as_str())
                    .with_payment_id(payment_id.as_str());
                let outcome = self.record_side_effect(&booking_id, update, "order.paid webhook").await;
                let event = BookingConfirmedEvent {
                    booking_id: Some(booking_id.clone()),
                    order_id: order_id.clone(),
                    payment_id: payment_id.clone(),
                    source: OutcomeSource::Webhook,
                };
                self.producers.publish_booking_confirmed(event).await;
                match outcome {
                    o if applied(o) => NotificationOutcome::Completed(booking_id),
                    Some(LedgerOutcome::Refused { current }) => {
                        NotificationOutcome::Ignored(format!("Booking {booking_id} is {current}"))
                    },
                    Some(LedgerOutcome::ForeignOrder) => {
                        NotificationOutcome::Ignored(format!("Booking {booking_id} belongs to another order"))
                    },
                    _ => NotificationOutcome::Ignored(format!("Booking {booking_id} could not be updated")),
                }
            },
            GatewayNotification::PaymentFailed { order_id, payment_id, reason } => {
                let Some(booking_id) = self.booking_id_for_order(order_id).await else {
                    return NotificationOutcome::Ignored(format!("No booking is linked to order {order_id}"));
                };
                info!("🔄️ Gateway reports payment {payment_id} on order {order_id} failed: {reason}");
                let update = StatusUpdate::new(BookingStatus::Failed).with_order_id(order_id.as_str());
                let outcome = self.record_side_effect(&booking_id, update, "payment.failed webhook").await;
                match outcome {
                    Some(LedgerOutcome::Refused { current }) => {
                        NotificationOutcome::Ignored(format!("Booking {booking_id} is {current}"))
                    },
                    Some(LedgerOutcome::ForeignOrder) => {
                        NotificationOutcome::Ignored(format!("Booking {booking_id} belongs to another order"))
                    },
                    o if applied(o) => {
                        let event = BookingFailedEvent {
                            booking_id: Some(booking_id.clone()),
                            order_id: Some(order_id.clone()),
                            reason: reason.clone(),
                            source: OutcomeSource::Webhook,
                        };
                        self.producers.publish_booking_failed(event).await;
                        NotificationOutcome::Failed(booking_id)
                    },
                    _ => NotificationOutcome::Ignored(format!("Booking {booking_id} could not be updated")),
                }
            },
            GatewayNotification::Other(event) => {
                debug!("🔄️ Ignoring gateway event {event}");
                NotificationOutcome::Ignored(format!("Unhandled event {event}"))
            },
        }
    }

    /// Settles every pending booking that is older than `grace`. Younger bookings are reported as unchanged.
    ///
    /// * If its gateway order has a captured payment, it is completed.
    /// * Otherwise, if it is older than `abandon_after`, it is failed.
    /// * Otherwise it is left alone, as is any booking whose gateway order could not be checked.
    pub async fn reconcile_pending(
        &self,
        grace: Duration,
        abandon_after: Duration,
    ) -> Result<ReconciliationReport, StoreError> {
        let pending = self.ledger.store().fetch_pending_bookings().await?;
        let now = Utc::now();
        let mut report = ReconciliationReport::default();
        debug!("🔄️ Reconciling {} pending booking(s)", pending.len());
        for booking in pending.into_iter().filter(|b| b.status == BookingStatus::Pending) {
            let age = now - booking.created_at;
            if age < grace {
                trace!("🔄️ Booking {} is only {}s old. Skipping.", booking.id, age.num_seconds());
                report.unchanged.push(booking.id);
                continue;
            }
            match self.reconcile_booking(&booking, age >= abandon_after).await {
                Some(BookingStatus::Completed) => report.completed.push(booking.id),
                Some(BookingStatus::Failed) => report.failed.push(booking.id),
                _ => report.unchanged.push(booking.id),
            }
        }
        Ok(report)
    }

    async fn reconcile_booking(&self, booking: &BookingRecord, abandoned: bool) -> Option<BookingStatus> {
        if let Some(order_id) = &booking.gateway_order_id {
            match self.gateway.fetch_captured_payment(order_id).await {
                Ok(Some(payment)) => {
                    info!("🔄️ Found captured payment {} for pending booking {}", payment.id, booking.id);
                    let update = StatusUpdate::new(BookingStatus::Completed)
                        .with_order_id(order_id.as_str())
                        .with_payment_id(payment.id.as_str());
                    if !applied(self.record_side_effect(&booking.id, update, "reconciliation sweep").await) {
                        return None;
                    }
                    let event = BookingConfirmedEvent {
                        booking_id: Some(booking.id.clone()),
                        order_id: order_id.clone(),
                        payment_id: payment.id,
                        source: OutcomeSource::Reconciliation,
                    };
                    self.producers.publish_booking_confirmed(event).await;
                    return Some(BookingStatus::Completed);
                },
                Ok(None) => {},
                Err(e) => {
                    warn!("🔄️ Could not check payments for order {order_id} (booking {}). {e}", booking.id);
                    return None;
                },
            }
        }
        if !abandoned {
            return None;
        }
        info!("🔄️ Booking {} was never paid. Marking it as failed.", booking.id);
        let mut update = StatusUpdate::new(BookingStatus::Failed);
        update.gateway_order_id = booking.gateway_order_id.clone();
        if !applied(self.record_side_effect(&booking.id, update, "reconciliation sweep").await) {
            return None;
        }
        let event = BookingFailedEvent {
            booking_id: Some(booking.id.clone()),
            order_id: booking.gateway_order_id.clone(),
            reason: "Abandoned without payment".to_string(),
            source: OutcomeSource::Reconciliation,
        };
        self.producers.publish_booking_failed(event).await;
        Some(BookingStatus::Failed)
    }
}
