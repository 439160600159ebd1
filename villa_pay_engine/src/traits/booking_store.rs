use thiserror::Error;

use crate::booking_types::{BookingHandle, BookingId, BookingRecord, NewBooking, StatusUpdate};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Record store rejected the request. Error {status}. [{code}] {message}")]
    Remote { status: u16, code: String, message: String },
    #[error("Could not reach the record store: {0}")]
    Transport(String),
    #[error("Record store returned unexpected data: {0}")]
    Data(String),
}

/// The record store that holds bookings.
///
/// Implementations do not enforce any status transition rules. That is done by
/// [`crate::flow_api::booking_ledger::BookingLedger`], which is the only thing that should call
/// [`BookingStore::update_status`].
#[allow(async_fn_in_trait)]
pub trait BookingStore {
    /// Creates a new record with status `pending`.
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingHandle, StoreError>;

    /// Writes the status, and the gateway ids that are given. Ids that are `None` are left as they are.
    async fn update_status(&self, booking_id: &BookingId, update: &StatusUpdate) -> Result<(), StoreError>;

    /// Returns `None` if the booking does not exist.
    async fn fetch_booking(&self, booking_id: &BookingId) -> Result<Option<BookingRecord>, StoreError>;

    /// All bookings whose status is `pending`, oldest first.
    async fn fetch_pending_bookings(&self) -> Result<Vec<BookingRecord>, StoreError>;
}
