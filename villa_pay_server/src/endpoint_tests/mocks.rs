use chrono::{Duration, NaiveDate, TimeZone, Utc};
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
    traits::{BookingStore, GatewayError, PaymentGateway, StoreError},
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

pub fn gateway_order(id: &str, booking_id: &str, amount: i64) -> GatewayOrder {
    GatewayOrder {
        id: id.to_string(),
        amount: MinorUnits::from(amount),
        currency: "INR".to_string(),
        status: "created".to_string(),
        receipt: Some("rcpt_1736500000000".to_string()),
        booking_id: Some(BookingId::from(booking_id)),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
    }
}

pub fn booking_record(id: &str, status: BookingStatus) -> BookingRecord {
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
        gateway_order_id: None,
        gateway_payment_id: None,
        created_at: Utc::now() - Duration::minutes(5),
    }
}
