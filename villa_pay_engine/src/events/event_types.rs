use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking_types::{BookingId, StatusUpdate};

/// Where a payment outcome was learnt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    /// The client reported the payment and the signature checked out.
    Checkout,
    /// The gateway told us via a webhook.
    Webhook,
    /// The periodic reconciliation sweep worked it out.
    Reconciliation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmedEvent {
    pub booking_id: Option<BookingId>,
    pub order_id: String,
    pub payment_id: String,
    pub source: OutcomeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFailedEvent {
    pub booking_id: Option<BookingId>,
    pub order_id: Option<String>,
    pub reason: String,
    pub source: OutcomeSource,
}

/// A bookkeeping write to the record store failed after the payment outcome had been decided. The record needs to be
/// corrected by hand (or by the next reconciliation sweep).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffectFailedEvent {
    pub booking_id: BookingId,
    pub attempted: StatusUpdate,
    pub context: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    BookingConfirmed(BookingConfirmedEvent),
    BookingFailed(BookingFailedEvent),
    SideEffectFailed(SideEffectFailedEvent),
}
