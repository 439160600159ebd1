#![allow(dead_code)]
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use chrono::{Duration, NaiveDate, Utc};
use mockall::mock;
use villa_pay_engine::{
    booking_types::{
        BookingHandle,
        BookingId,
        BookingRecord,
        BookingStatus,
        GatewayOrder,
        GatewayPayment,
        NewBooking,
        StatusUpdate,
    },
    events::{EventHandler, EventProducer},
    traits::{BookingStore, GatewayError, PaymentGateway, StoreError},
    validation::{AmountInput, BookingDetails, CheckoutInput, CountInput},
};
use vp_common::MinorUnits;

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_order(&self, amount: MinorUnits, currency: &str, booking_id: &BookingId) -> Result<GatewayOrder, GatewayError>;
        fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, GatewayError>;
        async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;
        async fn fetch_captured_payment(&self, order_id: &str) -> Result<Option<GatewayPayment>, GatewayError>;
    }
}

mock! {
    pub Store {}
    impl BookingStore for Store {
        async fn create_booking(&self, booking: &NewBooking) -> Result<BookingHandle, StoreError>;
        async fn update_status(&self, booking_id: &BookingId, update: &StatusUpdate) -> Result<(), StoreError>;
        async fn fetch_booking(&self, booking_id: &BookingId) -> Result<Option<BookingRecord>, StoreError>;
        async fn fetch_pending_bookings(&self) -> Result<Vec<BookingRecord>, StoreError>;
    }
}

pub fn booking_details() -> BookingDetails {
    BookingDetails {
        villa: Some("Villa Serenity".into()),
        check_in: Some("2025-01-10".into()),
        check_out: Some("2025-01-12".into()),
        customer_name: Some("Asha Rao".into()),
        customer_email: Some("asha@example.com".into()),
        customer_phone: Some("+91 98765 43210".into()),
        guests: Some(CountInput::Number(4.0)),
        extra_mattresses: Some(CountInput::Text("1".into())),
    }
}

pub fn checkout_input(amount: i64) -> CheckoutInput {
    CheckoutInput {
        amount: Some(AmountInput::Integer(amount)),
        currency: Some("INR".into()),
        booking: booking_details(),
    }
}

pub fn handle(id: &str) -> BookingHandle {
    BookingHandle { id: BookingId::from(id), url: format!("https://www.notion.so/{id}") }
}

pub fn record(id: &str, status: BookingStatus, order_id: Option<&str>, age: Duration) -> BookingRecord {
    BookingRecord {
        id: BookingId::from(id),
        url: format!("https://www.notion.so/{id}"),
        villa_name: "Villa Serenity".into(),
        check_in: NaiveDate::from_ymd_opt(2025, 1, 10),
        check_out: NaiveDate::from_ymd_opt(2025, 1, 12),
        guests: 4,
        extra_mattresses: 1,
        customer_name: "Asha Rao".into(),
        customer_email: "asha@example.com".into(),
        customer_phone: "919876543210".into(),
        amount: MinorUnits::from(4_999_900),
        status,
        gateway_order_id: order_id.map(String::from),
        gateway_payment_id: None,
        created_at: Utc::now() - age,
    }
}

pub fn pending(id: &str) -> BookingRecord {
    record(id, BookingStatus::Pending, None, Duration::minutes(1))
}

pub fn gateway_order(id: &str, booking_id: Option<&str>, amount: i64) -> GatewayOrder {
    GatewayOrder {
        id: id.into(),
        amount: MinorUnits::from(amount),
        currency: "INR".into(),
        status: "created".into(),
        receipt: Some("rcpt_1717000000000".into()),
        booking_id: booking_id.map(BookingId::from),
        created_at: Utc::now(),
    }
}

pub fn captured_payment(id: &str, order_id: &str) -> GatewayPayment {
    GatewayPayment {
        id: id.into(),
        order_id: order_id.into(),
        amount: MinorUnits::from(4_999_900),
        currency: "INR".into(),
        status: "captured".into(),
    }
}

/// Collects every event published to it. Call [`EventCapture::collect`] once all producers have been dropped.
pub struct EventCapture<E: Send + Sync + 'static> {
    handler: EventHandler<E>,
    seen: Arc<Mutex<Vec<E>>>,
}

impl<E: Send + Sync + 'static> EventCapture<E> {
    pub fn new() -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = EventHandler::new(
            32,
            Arc::new(move |ev: E| {
                let sink = Arc::clone(&sink);
                Box::pin(async move {
                    sink.lock().unwrap().push(ev);
                }) as Pin<Box<dyn Future<Output = ()> + Send>>
            }),
        );
        Self { handler, seen }
    }

    pub fn producer(&self) -> EventProducer<E> {
        self.handler.subscribe()
    }

    pub async fn collect(self) -> Vec<E> {
        self.handler.start_handler().await;
        let mut seen = self.seen.lock().unwrap();
        std::mem::take(&mut *seen)
    }
}
