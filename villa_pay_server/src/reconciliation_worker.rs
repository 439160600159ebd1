use log::*;
use tokio::task::JoinHandle;
use villa_pay_engine::{booking_types::BookingId, events::EventProducers, PaymentFlowApi};

use crate::{
    config::ReconciliationConfig,
    integrations::{notion::NotionBookingStore, razorpay::RazorpayGateway},
};

const FALLBACK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(600);

/// Starts the reconciliation worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `config.interval`, pending bookings are checked against their Razorpay orders. See
/// [`PaymentFlowApi::reconcile_pending`].
pub fn start_reconciliation_worker(
    gateway: RazorpayGateway,
    store: NotionBookingStore,
    producers: EventProducers,
    config: ReconciliationConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = config.interval.to_std().unwrap_or_else(|e| {
            warn!("🕰️ Invalid reconciliation interval. {e}. Using {}s instead.", FALLBACK_INTERVAL.as_secs());
            FALLBACK_INTERVAL
        });
        let mut timer = tokio::time::interval(period);
        let api = PaymentFlowApi::new(gateway, store, producers);
        info!("🕰️ Booking reconciliation worker started. Running every {}s", period.as_secs());
        loop {
            timer.tick().await;
            info!("🕰️ Running booking reconciliation job");
            match api.reconcile_pending(config.grace_period, config.abandon_after).await {
                Ok(report) => {
                    info!("🕰️ {} of {} pending bookings settled", report.changed_count(), report.total_count());
                    debug!("🕰️ Completed bookings: {}", booking_list(&report.completed));
                    debug!("🕰️ Failed bookings: {}", booking_list(&report.failed));
                },
                Err(e) => {
                    error!("🕰️ Error running booking reconciliation job: {e}");
                },
            }
        }
    })
}

fn booking_list(ids: &[BookingId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<String>>().join(", ")
}
