//! HMAC-SHA256 signatures used by Razorpay.
//!
//! Razorpay signs two things with HMAC-SHA256 and hex encodes the result:
//! * the checkout callback, over `"{order_id}|{payment_id}"` keyed with the API key secret, and
//! * webhook deliveries, over the raw request body keyed with the webhook secret. The signature arrives in the
//!   `X-Razorpay-Signature` header.
//!
//! Comparisons are constant time. A signature that is not valid hex simply fails verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use vp_common::Secret;

use crate::RazorpayApiError;

type HmacSha256 = Hmac<Sha256>;

pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

fn new_mac(secret: &Secret<String>) -> Result<HmacSha256, RazorpayApiError> {
    if secret.is_blank() {
        return Err(RazorpayApiError::Configuration("No signing secret has been configured".to_string()));
    }
    HmacSha256::new_from_slice(secret.reveal().as_bytes()).map_err(|e| RazorpayApiError::Configuration(e.to_string()))
}

/// Calculates the hex-encoded HMAC-SHA256 of `data`.
pub fn hmac_sha256_hex(secret: &Secret<String>, data: &[u8]) -> Result<String, RazorpayApiError> {
    let mut mac = new_mac(secret)?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a hex-encoded HMAC-SHA256 signature over `data`.
///
/// Returns `Ok(false)` for any mismatch, including a malformed signature. A blank secret is a configuration error and
/// never a silent `false`.
pub fn verify_hmac_sha256_hex(secret: &Secret<String>, data: &[u8], signature: &str) -> Result<bool, RazorpayApiError> {
    let mut mac = new_mac(secret)?;
    let Ok(expected) = hex::decode(signature.trim()) else {
        return Ok(false);
    };
    mac.update(data);
    Ok(mac.verify_slice(&expected).is_ok())
}

pub fn payment_signature_payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// The signature Razorpay's checkout hands back to the browser after a successful payment.
pub fn payment_signature(key_secret: &Secret<String>, order_id: &str, payment_id: &str) -> Result<String, RazorpayApiError> {
    hmac_sha256_hex(key_secret, payment_signature_payload(order_id, payment_id).as_bytes())
}

pub fn verify_payment_signature(
    key_secret: &Secret<String>,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<bool, RazorpayApiError> {
    verify_hmac_sha256_hex(key_secret, payment_signature_payload(order_id, payment_id).as_bytes(), signature)
}

pub fn verify_webhook_signature(
    webhook_secret: &Secret<String>,
    body: &[u8],
    signature: &str,
) -> Result<bool, RazorpayApiError> {
    verify_hmac_sha256_hex(webhook_secret, body, signature)
}
