use actix_web::http::StatusCode;
use mockall::Sequence;
use serde_json::{json, Value};
use villa_pay_engine::{
    booking_types::{BookingHandle, BookingId, BookingStatus},
    traits::{GatewayError, StoreError},
};
use vp_common::MinorUnits;

use super::{
    helpers::{configure, post_json},
    mocks::{booking_record, gateway_order, MockGateway, MockStore},
};

const ORDER_REQUEST: &str = r#"{
    "amount": 4999900,
    "currency": "INR",
    "notes": {
        "villa": "Villa Serenity",
        "checkIn": "2025-01-10",
        "checkOut": "2025-01-12",
        "customerName": "Asha Rao",
        "customerEmail": "asha@example.com",
        "customerPhone": "+91 98765 43210",
        "guests": 4,
        "extraMattresses": "1"
    }
}"#;

fn handle(id: &str) -> BookingHandle {
    BookingHandle { id: BookingId::from(id), url: format!("https://www.notion.so/{id}") }
}

fn fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .expect("details should list the violations")
        .iter()
        .map(|v| v["field"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[actix_web::test]
async fn booking_is_recorded_before_the_order_is_opened() {
    let _ = env_logger::try_init().ok();
    let mut seq = Sequence::new();
    let mut store = MockStore::new();
    let mut gateway = MockGateway::new();
    store
        .expect_create_booking()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|b| b.villa_name == "Villa Serenity" && b.guests == 4 && b.customer_phone == "919876543210")
        .returning(|_| Ok(handle("page-A")));
    gateway
        .expect_create_order()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|amount, currency, id| {
            *amount == MinorUnits::from(4_999_900) && currency == "INR" && id.as_str() == "page-A"
        })
        .returning(|_, _, _| Ok(gateway_order("order_A", "page-A", 4_999_900)));
    store.expect_fetch_booking().returning(|id| Ok(Some(booking_record(id.as_str(), BookingStatus::Pending))));
    store
        .expect_update_status()
        .times(1)
        .withf(|id, u| {
            id.as_str() == "page-A" &&
                u.status == BookingStatus::Pending &&
                u.gateway_order_id.as_deref() == Some("order_A")
        })
        .returning(|_, _| Ok(()));

    let (status, body) = post_json("/api/payments/orders", ORDER_REQUEST, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(
        body,
        json!({"success": true, "orderId": "order_A", "amount": 4999900, "currency": "INR", "bookingId": "page-A"})
    );
}

#[actix_web::test]
async fn gateway_failure_fails_the_booking() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    let mut gateway = MockGateway::new();
    store.expect_create_booking().times(1).returning(|_| Ok(handle("page-B")));
    gateway
        .expect_create_order()
        .times(1)
        .returning(|_, _, _| Err(GatewayError::Transport("connection reset".into())));
    store.expect_fetch_booking().returning(|id| Ok(Some(booking_record(id.as_str(), BookingStatus::Pending))));
    store
        .expect_update_status()
        .times(1)
        .withf(|id, u| id.as_str() == "page-B" && u.status == BookingStatus::Failed)
        .returning(|_, _| Ok(()));

    let (status, body) = post_json("/api/payments/orders", ORDER_REQUEST, configure(gateway, store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to create order");
    assert_eq!(body["details"], "Could not reach the payment gateway: connection reset");
}

#[actix_web::test]
async fn store_failure_never_reaches_the_gateway() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_create_booking().times(1).returning(|_| Err(StoreError::Transport("timed out".into())));
    // No expectations on the gateway, so any call to it fails the test

    let (status, body) = post_json("/api/payments/orders", ORDER_REQUEST, configure(MockGateway::new(), store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["error"], "Failed to create booking");
}

#[actix_web::test]
async fn every_invalid_field_is_reported() {
    let _ = env_logger::try_init().ok();
    let request = r#"{"amount": 4999900, "notes": {"checkIn": "2025-01-12", "checkOut": "2025-01-10"}}"#;
    let (status, body) =
        post_json("/api/payments/orders", request, configure(MockGateway::new(), MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    let fields = fields(&body);
    for field in ["villa", "checkOut", "customerName", "customerEmail", "customerPhone"] {
        assert!(fields.iter().any(|f| f == field), "{field} should be reported in {fields:?}");
    }
    assert!(!fields.iter().any(|f| f == "amount"));
}

#[actix_web::test]
async fn non_positive_amounts_are_rejected() {
    let _ = env_logger::try_init().ok();
    let request = ORDER_REQUEST.replace("4999900", "0");
    let (status, body) =
        post_json("/api/payments/orders", &request, configure(MockGateway::new(), MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    assert_eq!(fields(&body), vec!["amount".to_string()]);
}

#[actix_web::test]
async fn malformed_bodies() {
    let _ = env_logger::try_init().ok();
    for request in [r#"{"amount": 100, "discount": 10}"#, "{not json", r#"{"amount": [1]}"#] {
        let (status, body) =
            post_json("/api/payments/orders", request, configure(MockGateway::new(), MockStore::new())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["details"].is_string());
    }
}
