use vp_common::Secret;

use crate::RazorpayApiError;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub webhook_secret: Secret<String>,
    pub api_url: String,
    /// Recorded in the notes of every order so that test-mode orders can be told apart in the dashboard.
    pub environment: String,
}

impl RazorpayConfig {
    pub fn new(key_id: &str, key_secret: &str, webhook_secret: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            key_secret: Secret::new(key_secret.to_string()),
            webhook_secret: Secret::new(webhook_secret.to_string()),
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
            environment: "development".to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_string();
        self
    }

    /// Checks that the API credentials are present. The webhook secret is checked separately, when a webhook arrives.
    pub fn validate(&self) -> Result<(), RazorpayApiError> {
        let mut missing = vec![];
        if self.key_id.trim().is_empty() {
            missing.push("key id");
        }
        if self.key_secret.is_blank() {
            missing.push("key secret");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RazorpayApiError::Configuration(format!("Missing Razorpay {}", missing.join(" and "))))
        }
    }
}
