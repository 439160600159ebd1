use futures::future::BoxFuture;
use log::*;
use villa_pay_engine::{
    events::{BookingConfirmedEvent, BookingFailedEvent, EventHandlers, EventHooks, SideEffectFailedEvent},
    SIDE_EFFECT_LOG_TARGET,
};

pub const BOOKING_EVENT_BUFFER_SIZE: usize = 25;

/// Event handlers that keep an audit trail of booking outcomes in the logs.
///
/// 1. BookingConfirmedEvent and BookingFailedEvent - one line per outcome, with where it was learnt from.
/// 2. SideEffectFailedEvent - the record store disagrees with the gateway. This is repeated on the side-effect log
///    target with enough detail to fix the record by hand, in case the next reconciliation sweep cannot.
pub fn create_booking_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks
        .on_booking_confirmed(|ev| {
            let BookingConfirmedEvent { booking_id, order_id, payment_id, source } = ev;
            match booking_id {
                Some(id) => info!("🔄️ Booking {id} confirmed via {source:?}. Order {order_id}, payment {payment_id}"),
                None => warn!("🔄️ Payment {payment_id} for order {order_id} confirmed via {source:?}, with no booking"),
            }
            no_op()
        })
        .on_booking_failed(|ev| {
            let BookingFailedEvent { booking_id, order_id, reason, source } = ev;
            let booking = booking_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
            let order = order_id.unwrap_or_else(|| "-".to_string());
            info!("🔄️ Booking {booking} failed via {source:?}. Order {order}. {reason}");
            no_op()
        })
        .on_side_effect_failed(|ev| {
            let SideEffectFailedEvent { booking_id, attempted, context, error, timestamp } = ev;
            warn!(
                target: SIDE_EFFECT_LOG_TARGET,
                "MANUAL FOLLOW-UP: set booking {booking_id} to {attempted} ({context}, at {}). Last error: {error}",
                timestamp.to_rfc3339()
            );
            no_op()
        });
    EventHandlers::new(BOOKING_EVENT_BUFFER_SIZE, hooks)
}

fn no_op() -> BoxFuture<'static, ()> {
    Box::pin(async {})
}
