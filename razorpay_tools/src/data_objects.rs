use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Razorpay serialises an empty `notes` object as `[]`. Any other non-object value is treated as empty too.
fn notes_map_or_empty_array<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let notes = match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(notes)
}

//--------------------------------------     NewOrder       ---------------------------------------------------------

/// The body of a `POST /v1/orders` call.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
    pub notes: BTreeMap<String, String>,
}

impl NewOrder {
    pub fn new(amount: i64, currency: &str, receipt: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            payment_capture: 1,
            notes: BTreeMap::new(),
        }
    }

    pub fn with_note(mut self, key: &str, value: &str) -> Self {
        self.notes.insert(key.to_string(), value.to_string());
        self
    }
}

//--------------------------------------     RazorpayOrder       ------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// One of `created`, `attempted` or `paid`
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, deserialize_with = "notes_map_or_empty_array")]
    pub notes: BTreeMap<String, String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl RazorpayOrder {
    pub fn note(&self, key: &str) -> Option<&str> {
        self.notes.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }

    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

//--------------------------------------     RazorpayPayment       ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    pub currency: String,
    /// One of `created`, `authorized`, `captured`, `refunded` or `failed`
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub captured: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default, deserialize_with = "notes_map_or_empty_array")]
    pub notes: BTreeMap<String, String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl RazorpayPayment {
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentCollection {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub items: Vec<RazorpayPayment>,
}

//--------------------------------------     Webhooks       -----------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<EntityWrapper<RazorpayPayment>>,
    #[serde(default)]
    pub order: Option<EntityWrapper<RazorpayOrder>>,
}

/// A webhook delivery, e.g. `order.paid` or `payment.failed`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub account_id: Option<String>,
    pub event: String,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub payload: WebhookPayload,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl WebhookEvent {
    pub fn payment(&self) -> Option<&RazorpayPayment> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }

    pub fn order(&self) -> Option<&RazorpayOrder> {
        self.payload.order.as_ref().map(|o| &o.entity)
    }
}
