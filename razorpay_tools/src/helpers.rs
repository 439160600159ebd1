use chrono::Utc;

use crate::RazorpayApiError;

/// Receipt ids take the form `rcpt_<unix millis>`. Razorpay limits receipts to 40 characters.
pub fn new_receipt_id() -> String {
    format!("rcpt_{}", Utc::now().timestamp_millis())
}

/// Currency codes are three ASCII letters. They are normalised to upper case.
pub fn normalize_currency(currency: &str) -> Result<String, RazorpayApiError> {
    let currency = currency.trim();
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(currency.to_ascii_uppercase())
    } else {
        Err(RazorpayApiError::InvalidCurrency(format!("'{currency}' is not a 3-letter currency code")))
    }
}
