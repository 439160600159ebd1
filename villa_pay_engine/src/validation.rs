//! Validation of raw checkout input.
//!
//! Checkout input arrives from the browser with very loose typing: the amount may be a number or a numeric string,
//! and guest counts are often sent as strings. [`CheckoutInput::validate`] checks everything at once and reports
//! every violation it finds, rather than stopping at the first.
use std::{fmt::Display, sync::OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vp_common::{helpers::digits_only, MinorUnits, DEFAULT_CURRENCY_CODE};

use crate::booking_types::NewBooking;

pub const MIN_GUESTS: u8 = 1;
pub const MAX_GUESTS: u8 = 10;
pub const MAX_EXTRA_MATTRESSES: u8 = 5;

//--------------------------------------     FieldViolation      -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        Self { field: field.to_string(), message: message.to_string() }
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

//--------------------------------------     ValidationErrors    -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.violations.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl From<FieldViolation> for ValidationErrors {
    fn from(v: FieldViolation) -> Self {
        Self { violations: vec![v] }
    }
}

//--------------------------------------       AmountInput       -------------------------------------------------------
/// An amount in minor currency units, as sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Integer(i64),
    /// Fractional minor units are rounded to the nearest unit.
    Float(f64),
    Text(String),
}

impl AmountInput {
    pub fn to_minor_units(&self) -> Result<MinorUnits, String> {
        let amount = match self {
            AmountInput::Integer(v) => MinorUnits::from(*v),
            AmountInput::Float(v) => MinorUnits::try_from(*v).map_err(|e| e.to_string())?,
            AmountInput::Text(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(v) => MinorUnits::from(v),
                    Err(_) => {
                        let v = s.parse::<f64>().map_err(|_| format!("'{s}' is not a valid number"))?;
                        MinorUnits::try_from(v).map_err(|e| e.to_string())?
                    },
                }
            },
        };
        if amount.is_positive() {
            Ok(amount)
        } else {
            Err(format!("Amount must be a positive number, not {}", amount.value()))
        }
    }
}

impl From<i64> for AmountInput {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

//--------------------------------------       CountInput        -------------------------------------------------------
/// A head count, sent either as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountInput {
    Number(f64),
    Text(String),
}

impl CountInput {
    /// Reads the leading integer, like the booking form does, and clamps it to `[min, max]`. Integers too long for
    /// an `i64` saturate. Anything that is not a number at all falls back to `default`.
    pub fn to_count(&self, default: u8, min: u8, max: u8) -> u8 {
        let n = match self {
            CountInput::Number(v) if v.is_finite() => Some(v.trunc()),
            CountInput::Number(_) => None,
            CountInput::Text(s) => {
                let s = s.trim();
                let end = s
                    .char_indices()
                    .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
                    .map_or(s.len(), |(i, _)| i);
                // Only digits (and a sign) are left, so an f64 parse cannot overflow to an error.
                s[..end].parse::<f64>().ok()
            },
        };
        match n {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(v) => v.clamp(f64::from(min), f64::from(max)) as u8,
            None => default,
        }
    }
}

//--------------------------------------      BookingDetails     -------------------------------------------------------
/// The booking form, exactly as submitted. Every field is optional here so that all missing fields can be reported
/// together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub villa: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub guests: Option<CountInput>,
    pub extra_mattresses: Option<CountInput>,
}

//--------------------------------------      CheckoutInput      -------------------------------------------------------
/// Everything needed to start a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutInput {
    pub amount: Option<AmountInput>,
    pub currency: Option<String>,
    pub booking: BookingDetails,
}

fn looks_like_email(s: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map_or(true, |re| re.is_match(s))
}

fn required<'a>(value: &'a Option<String>, field: &str, label: &str, errors: &mut ValidationErrors) -> &'a str {
    let v = value.as_deref().map(str::trim).unwrap_or_default();
    if v.is_empty() {
        errors.push(field, &format!("{label} is required"));
    }
    v
}

fn iso_date(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(field, &format!("{label} must be a date in YYYY-MM-DD format"));
            None
        },
    }
}

impl CheckoutInput {
    /// Checks every field and produces a [`NewBooking`], or the complete list of problems.
    pub fn validate(&self) -> Result<NewBooking, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let amount = match &self.amount {
            None => {
                errors.push("amount", "Amount is required");
                None
            },
            Some(a) => match a.to_minor_units() {
                Ok(v) => Some(v),
                Err(e) => {
                    errors.push("amount", &e);
                    None
                },
            },
        };
        let currency = self.currency.as_deref().map(str::trim).unwrap_or(DEFAULT_CURRENCY_CODE);
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push("currency", "Currency must be a 3-letter code");
        }
        let b = &self.booking;
        let villa = required(&b.villa, "villa", "Villa name", &mut errors);
        let check_in = required(&b.check_in, "checkIn", "Check-in date", &mut errors);
        let check_in = iso_date(check_in, "checkIn", "Check-in date", &mut errors);
        let check_out = required(&b.check_out, "checkOut", "Check-out date", &mut errors);
        let check_out = iso_date(check_out, "checkOut", "Check-out date", &mut errors);
        if let (Some(i), Some(o)) = (check_in, check_out) {
            if o <= i {
                errors.push("checkOut", "Check-out date must be after the check-in date");
            }
        }
        let name = required(&b.customer_name, "customerName", "Customer name", &mut errors);
        let email = required(&b.customer_email, "customerEmail", "Customer email", &mut errors);
        if !email.is_empty() && !looks_like_email(email) {
            errors.push("customerEmail", "Customer email is not a valid email address");
        }
        let phone = digits_only(b.customer_phone.as_deref().unwrap_or_default());
        if phone.is_empty() {
            errors.push("customerPhone", "Customer phone is required");
        }
        let guests = b.guests.as_ref().map_or(MIN_GUESTS, |g| g.to_count(MIN_GUESTS, MIN_GUESTS, MAX_GUESTS));
        let extra_mattresses =
            b.extra_mattresses.as_ref().map_or(0, |m| m.to_count(0, 0, MAX_EXTRA_MATTRESSES));
        match (amount, check_in, check_out) {
            (Some(amount), Some(check_in), Some(check_out)) if errors.is_empty() => Ok(NewBooking {
                villa_name: villa.to_string(),
                check_in,
                check_out,
                guests,
                extra_mattresses,
                customer_name: name.to_string(),
                customer_email: email.to_string(),
                customer_phone: phone,
                amount,
                currency: currency.to_ascii_uppercase(),
            }),
            _ => Err(errors),
        }
    }
}
