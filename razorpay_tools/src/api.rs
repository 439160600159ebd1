use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{NewOrder, PaymentCollection},
    helpers::{new_receipt_id, normalize_currency},
    signature,
    RazorpayApiError,
    RazorpayOrder,
    RazorpayPayment,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    /// Creates a new client. Fails with [`RazorpayApiError::Configuration`] if the API credentials are absent.
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        config.validate()?;
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        self.config.validate()?;
        let url = self.url(path);
        trace!("💳️ Sending REST query: {method} {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("💳️ REST query successful. {status}");
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let text = response.text().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
            let (code, description) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (body.error.code, body.error.description),
                Err(_) => ("UNKNOWN".to_string(), text),
            };
            Err(RazorpayApiError::QueryError { status: status.as_u16(), code, description })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Opens a new order for `amount` minor currency units. The order is auto-captured, and `notes` are attached
    /// alongside the standard `source`, `created_at` and `environment` notes.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        notes: &[(&str, &str)],
    ) -> Result<RazorpayOrder, RazorpayApiError> {
        if amount <= 0 {
            return Err(RazorpayApiError::InvalidAmount(format!("{amount} is not a positive amount")));
        }
        let currency = normalize_currency(currency)?;
        let created_at = chrono::Utc::now().to_rfc3339();
        let mut order = NewOrder::new(amount, &currency, &new_receipt_id())
            .with_note("source", "villa_pay")
            .with_note("created_at", &created_at)
            .with_note("environment", &self.config.environment);
        for (key, value) in notes {
            order = order.with_note(key, value);
        }
        debug!("💳️ Creating order for {amount} {currency} (receipt {})", order.receipt);
        let result = self.rest_query::<RazorpayOrder, NewOrder>(Method::POST, "/orders", &[], Some(order)).await?;
        info!("💳️ Created order {} for {} {}", result.id, result.amount, result.currency);
        Ok(result)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder, RazorpayApiError> {
        let path = format!("/orders/{order_id}");
        debug!("💳️ Fetching order {order_id}");
        let result = self.rest_query::<RazorpayOrder, ()>(Method::GET, &path, &[], None).await?;
        debug!("💳️ Fetched order {order_id}. Status: {}", result.status);
        Ok(result)
    }

    pub async fn fetch_order_payments(&self, order_id: &str) -> Result<Vec<RazorpayPayment>, RazorpayApiError> {
        let path = format!("/orders/{order_id}/payments");
        debug!("💳️ Fetching payments for order {order_id}");
        let result = self.rest_query::<PaymentCollection, ()>(Method::GET, &path, &[], None).await?;
        debug!("💳️ Order {order_id} has {} payment(s)", result.items.len());
        Ok(result.items)
    }

    /// Checks the signature returned by checkout against `HMAC-SHA256(key_secret, "{order_id}|{payment_id}")`.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, RazorpayApiError> {
        signature::verify_payment_signature(&self.config.key_secret, order_id, payment_id, signature)
    }

    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<bool, RazorpayApiError> {
        signature::verify_webhook_signature(&self.config.webhook_secret, body, signature)
    }
}
