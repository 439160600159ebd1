//! Domain types shared by the booking flows and the backends that implement [`crate::traits`].
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vp_common::{helpers::is_page_id, MinorUnits};

//--------------------------------------        BookingId        -------------------------------------------------------
/// The identifier the record store assigned to a booking when it was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl FromStr for BookingId {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for BookingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BookingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Record store ids are 32 hex digits, optionally grouped with dashes. Anything else cannot name a booking.
    pub fn is_well_formed(&self) -> bool {
        is_page_id(&self.0)
    }
}

//--------------------------------------     BookingStatus       -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// The booking has been recorded, but no payment outcome is known yet.
    Pending,
    /// A payment for the booking has been verified.
    Completed,
    /// The order could not be created, or the payment could not be verified.
    Failed,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Completed => write!(f, "Completed"),
            BookingStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid booking status: {0}")]
pub struct ConversionError(String);

impl FromStr for BookingStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

impl BookingStatus {
    /// Whether a booking in this state may be moved to `next`.
    ///
    /// * Pending bookings can move anywhere.
    /// * Writing the current status again is always allowed, so that gateway ids can be attached idempotently.
    /// * A completed booking is never downgraded.
    /// * A failed booking can still be completed, because a verified payment always wins.
    /// * Nothing goes back to pending.
    pub fn allows_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, _) => true,
            (a, b) if *a == b => true,
            (Failed, Completed) => true,
            _ => false,
        }
    }
}

//--------------------------------------       NewBooking        -------------------------------------------------------
/// A validated booking, ready to be written to the record store. Construct it with
/// [`crate::validation::BookingDetails::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    pub villa_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u8,
    pub extra_mattresses: u8,
    pub customer_name: String,
    pub customer_email: String,
    /// Digits only
    pub customer_phone: String,
    pub amount: MinorUnits,
    pub currency: String,
}

//--------------------------------------      BookingHandle      -------------------------------------------------------
/// What the record store hands back after creating a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingHandle {
    pub id: BookingId,
    /// A human-viewable link to the record
    pub url: String,
}

//--------------------------------------      BookingRecord      -------------------------------------------------------
/// A booking as it is currently held in the record store. Fields that were edited out of the store by hand are left
/// empty rather than failing the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub url: String,
    pub villa_name: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u8,
    pub extra_mattresses: u8,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub amount: MinorUnits,
    pub status: BookingStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// A record would be unchanged by `update` if the status is the same and every gateway id it carries is already
    /// recorded.
    pub fn already_reflects(&self, update: &StatusUpdate) -> bool {
        self.status == update.status &&
            update.gateway_order_id.as_ref().map_or(true, |id| self.gateway_order_id.as_ref() == Some(id)) &&
            update.gateway_payment_id.as_ref().map_or(true, |id| self.gateway_payment_id.as_ref() == Some(id))
    }
}

//--------------------------------------       StatusUpdate      -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: BookingStatus) -> Self {
        Self { status, gateway_order_id: None, gateway_payment_id: None }
    }

    pub fn with_order_id<S: Into<String>>(mut self, order_id: S) -> Self {
        self.gateway_order_id = Some(order_id.into());
        self
    }

    pub fn with_payment_id<S: Into<String>>(mut self, payment_id: S) -> Self {
        self.gateway_payment_id = Some(payment_id.into());
        self
    }
}

impl Display for StatusUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(id) = &self.gateway_order_id {
            write!(f, " order={id}")?;
        }
        if let Some(id) = &self.gateway_payment_id {
            write!(f, " payment={id}")?;
        }
        Ok(())
    }
}

//--------------------------------------       GatewayOrder      -------------------------------------------------------
/// An order as reported by the payment gateway. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: MinorUnits,
    pub currency: String,
    /// `created`, `attempted` or `paid`
    pub status: String,
    pub receipt: Option<String>,
    /// The booking the order was opened for, taken from the order notes.
    pub booking_id: Option<BookingId>,
    pub created_at: DateTime<Utc>,
}

impl GatewayOrder {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

//--------------------------------------      GatewayPayment     -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub order_id: String,
    pub amount: MinorUnits,
    pub currency: String,
    /// `created`, `authorized`, `captured`, `refunded` or `failed`
    pub status: String,
}

impl GatewayPayment {
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }
}

#[cfg(test)]
mod test {
    use super::{BookingStatus::*, *};

    #[test]
    fn status_strings() {
        assert_eq!(Completed.to_string(), "Completed");
        assert_eq!("pending".parse::<BookingStatus>().unwrap(), Pending);
        assert_eq!("Failed".parse::<BookingStatus>().unwrap(), Failed);
        assert!("paid".parse::<BookingStatus>().is_err());
        assert_eq!(serde_json::to_string(&Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn transitions() {
        assert!(Pending.allows_transition_to(Completed));
        assert!(Pending.allows_transition_to(Failed));
        assert!(Pending.allows_transition_to(Pending));
        assert!(Failed.allows_transition_to(Failed));
        assert!(Failed.allows_transition_to(Completed));
        assert!(Completed.allows_transition_to(Completed));
        assert!(!Completed.allows_transition_to(Failed));
        assert!(!Completed.allows_transition_to(Pending));
        assert!(!Failed.allows_transition_to(Pending));
    }

    #[test]
    fn updates_that_change_nothing() {
        let record = BookingRecord {
            id: BookingId::from("page-1"),
            url: String::new(),
            villa_name: "Villa Azure".into(),
            check_in: None,
            check_out: None,
            guests: 2,
            extra_mattresses: 0,
            customer_name: "A".into(),
            customer_email: "a@b.co".into(),
            customer_phone: "123".into(),
            amount: MinorUnits::from(100),
            status: Failed,
            gateway_order_id: Some("order_1".into()),
            gateway_payment_id: None,
            created_at: Utc::now(),
        };
        assert!(record.already_reflects(&StatusUpdate::new(Failed)));
        assert!(record.already_reflects(&StatusUpdate::new(Failed).with_order_id("order_1")));
        assert!(!record.already_reflects(&StatusUpdate::new(Failed).with_order_id("order_2")));
        assert!(!record.already_reflects(&StatusUpdate::new(Failed).with_payment_id("pay_1")));
        assert!(!record.already_reflects(&StatusUpdate::new(Completed)));
    }
}
