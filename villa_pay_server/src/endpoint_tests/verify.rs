use actix_web::http::StatusCode;
use serde_json::{json, Value};
use villa_pay_engine::{booking_types::BookingStatus, traits::GatewayError};

use super::{
    helpers::{configure, post_json},
    mocks::{booking_record, MockGateway, MockStore},
};

const BOOKING_ID: &str = "1a2b3c4d-5e6f-4071-8293-a4b5c6d7e8f9";
const VERIFY_REQUEST: &str = r#"{
    "razorpay_order_id": "order_C",
    "razorpay_payment_id": "pay_C",
    "razorpay_signature": "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d",
    "bookingId": "1a2b3c4d-5e6f-4071-8293-a4b5c6d7e8f9"
}"#;

fn store_expecting(status: BookingStatus) -> MockStore {
    let mut store = MockStore::new();
    store.expect_fetch_booking().returning(|id| Ok(Some(booking_record(id.as_str(), BookingStatus::Pending))));
    store
        .expect_update_status()
        .times(1)
        .withf(move |id, u| {
            id.as_str() == BOOKING_ID && u.status == status && u.gateway_order_id.as_deref() == Some("order_C")
        })
        .returning(|_, _| Ok(()));
    store
}

#[actix_web::test]
async fn verified_payment_completes_the_booking() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_verify_signature()
        .times(1)
        .withf(|order_id, payment_id, _| order_id == "order_C" && payment_id == "pay_C")
        .returning(|_, _, _| Ok(true));
    let store = store_expecting(BookingStatus::Completed);

    let (status, body) = post_json("/api/payments/verify", VERIFY_REQUEST, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Payment verified successfully",
            "paymentId": "pay_C",
            "orderId": "order_C",
            "bookingId": BOOKING_ID
        })
    );
}

#[actix_web::test]
async fn signature_mismatch_fails_the_booking() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_verify_signature().times(1).returning(|_, _, _| Ok(false));
    let store = store_expecting(BookingStatus::Failed);

    let (status, body) = post_json("/api/payments/verify", VERIFY_REQUEST, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Payment verification failed");
}

#[actix_web::test]
async fn missing_fields_are_named() {
    let _ = env_logger::try_init().ok();
    let request = r#"{"razorpay_order_id": "order_C", "razorpay_signature": ""}"#;
    let (status, body) =
        post_json("/api/payments/verify", request, configure(MockGateway::new(), MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["error"], "Missing required fields: razorpay_payment_id, razorpay_signature");
    assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn missing_secret_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_verify_signature()
        .returning(|_, _, _| Err(GatewayError::Configuration("No signing secret has been configured".into())));
    let store = store_expecting(BookingStatus::Failed);

    let (status, body) = post_json("/api/payments/verify", VERIFY_REQUEST, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["error"], "Server configuration error");
}

#[actix_web::test]
async fn malformed_booking_id_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_verify_signature().never();
    let mut store = MockStore::new();
    store.expect_fetch_booking().never();
    store.expect_update_status().never();
    let request = VERIFY_REQUEST.replace(BOOKING_ID, "../databases/1a2b3c4d5e6f40718293a4b5c6d7e8f9");

    let (status, body) = post_json("/api/payments/verify", &request, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "bookingId");
}
