//! The only path by which booking statuses are changed.
//!
//! [`BookingLedger`] wraps a [`BookingStore`] and enforces the status transition rules of
//! [`BookingStatus::allows_transition_to`]. Writes are idempotent: an update that would not change the record is not
//! sent at all, and a disallowed transition is logged and skipped rather than reported as an error. An update naming a
//! gateway order other than the one recorded on the booking is refused the same way.
use log::*;

use crate::{
    booking_types::{BookingHandle, BookingId, BookingStatus, NewBooking, StatusUpdate},
    traits::{BookingStore, StoreError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// The update was written.
    Applied,
    /// The record already reflected the update.
    Unchanged,
    /// The transition is not allowed from the record's current status.
    Refused { current: BookingStatus },
    /// The update names a gateway order other than the one the booking was opened with.
    ForeignOrder,
}

pub struct BookingLedger<S> {
    store: S,
}

impl<S> BookingLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> BookingLedger<S>
where S: BookingStore
{
    pub async fn create(&self, booking: &NewBooking) -> Result<BookingHandle, StoreError> {
        debug!(
            "📒️ Recording pending booking for {} ({} to {}, {} guest(s)) at {} {}",
            booking.villa_name, booking.check_in, booking.check_out, booking.guests, booking.amount, booking.currency
        );
        let handle = self.store.create_booking(booking).await?;
        info!("📒️ Booking {} created as pending", handle.id);
        Ok(handle)
    }

    pub async fn apply(&self, booking_id: &BookingId, update: &StatusUpdate) -> Result<LedgerOutcome, StoreError> {
        let record = self
            .store
            .fetch_booking(booking_id)
            .await?
            .ok_or_else(|| StoreError::Data(format!("Booking {booking_id} does not exist")))?;
        if let (Some(recorded), Some(claimed)) = (&record.gateway_order_id, &update.gateway_order_id) {
            if recorded != claimed {
                warn!(
                    "📒️ Booking {booking_id} belongs to order {recorded}, not {claimed}. Refusing to change it to \
                     {update}."
                );
                return Ok(LedgerOutcome::ForeignOrder);
            }
        }
        if record.already_reflects(update) {
            debug!("📒️ Booking {booking_id} is already {update}. Nothing to do.");
            return Ok(LedgerOutcome::Unchanged);
        }
        if !record.status.allows_transition_to(update.status) {
            warn!(
                "📒️ Booking {booking_id} is {} and cannot be changed to {update}. Leaving it as it is.",
                record.status
            );
            return Ok(LedgerOutcome::Refused { current: record.status });
        }
        self.store.update_status(booking_id, update).await?;
        info!("📒️ Booking {booking_id}: {} -> {update}", record.status);
        Ok(LedgerOutcome::Applied)
    }
}
