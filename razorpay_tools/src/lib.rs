mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;
pub mod signature;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewOrder, PaymentCollection, RazorpayOrder, RazorpayPayment, WebhookEvent, WebhookPayload};
pub use error::RazorpayApiError;
