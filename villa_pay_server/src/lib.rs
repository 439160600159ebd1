//! # Villa Pay server
//! This crate hosts the HTTP server for villa bookings. It is responsible for:
//! * Accepting bookings from the website, recording them in Notion and opening a Razorpay order for each.
//! * Verifying the payment signature the website reports once the customer has paid, and confirming the booking.
//! * Listening for Razorpay webhooks, and periodically reconciling bookings that were left pending.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health` and `/api/health`: Health checks.
//! * `/api/payments/orders`: Start a checkout.
//! * `/api/payments/verify`: Confirm a payment.
//! * `/api/payments/webhook`: Razorpay webhooks. Requests must carry a valid `X-Razorpay-Signature`.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
