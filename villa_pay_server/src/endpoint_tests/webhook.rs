use actix_web::http::StatusCode;
use razorpay_tools::signature::{hmac_sha256_hex, WEBHOOK_SIGNATURE_HEADER};
use serde_json::Value;
use villa_pay_engine::booking_types::BookingStatus;
use vp_common::Secret;

use super::{
    helpers::{configure, post_request, WEBHOOK_SECRET},
    mocks::{booking_record, MockGateway, MockStore},
};

const ORDER_PAID: &str = r#"{
    "entity": "event",
    "event": "order.paid",
    "contains": ["payment", "order"],
    "payload": {
        "payment": { "entity": {
            "id": "pay_A", "entity": "payment", "amount": 4999900, "currency": "INR", "status": "captured",
            "order_id": "order_A", "captured": true, "notes": [], "created_at": 1736500100
        }},
        "order": { "entity": {
            "id": "order_A", "entity": "order", "amount": 4999900, "amount_paid": 4999900, "amount_due": 0,
            "currency": "INR", "receipt": "rcpt_1736500000000", "status": "paid", "attempts": 1,
            "notes": { "booking_id": "page-A" }, "created_at": 1736500000
        }}
    },
    "created_at": 1736500105
}"#;

fn sign(body: &str) -> String {
    hmac_sha256_hex(&Secret::new(WEBHOOK_SECRET.to_string()), body.as_bytes()).expect("Could not sign body")
}

async fn deliver(body: &str, signature: Option<&str>, gateway: MockGateway, store: MockStore) -> (StatusCode, Value) {
    let headers = signature.map(|s| vec![(WEBHOOK_SIGNATURE_HEADER, s)]).unwrap_or_default();
    let (status, body) = post_request("/api/payments/webhook", body, &headers, configure(gateway, store)).await;
    let body = serde_json::from_str::<Value>(&body).expect("Response should be JSON");
    (status, body)
}

#[actix_web::test]
async fn unsigned_webhooks_are_forbidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = deliver(ORDER_PAID, None, MockGateway::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid webhook signature");
}

#[actix_web::test]
async fn badly_signed_webhooks_are_forbidden() {
    let _ = env_logger::try_init().ok();
    let tampered = ORDER_PAID.replace("page-A", "page-Z");
    let signature = sign(ORDER_PAID);
    let (status, _) = deliver(&tampered, Some(&signature), MockGateway::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = deliver(ORDER_PAID, Some("not-hex"), MockGateway::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn order_paid_completes_the_booking() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_booking().returning(|id| Ok(Some(booking_record(id.as_str(), BookingStatus::Pending))));
    store
        .expect_update_status()
        .times(1)
        .withf(|id, u| {
            id.as_str() == "page-A" &&
                u.status == BookingStatus::Completed &&
                u.gateway_order_id.as_deref() == Some("order_A") &&
                u.gateway_payment_id.as_deref() == Some("pay_A")
        })
        .returning(|_, _| Ok(()));
    let signature = sign(ORDER_PAID);
    let (status, body) = deliver(ORDER_PAID, Some(&signature), MockGateway::new(), store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking page-A completed");
}

#[actix_web::test]
async fn other_events_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let event = r#"{"entity": "event", "event": "refund.created", "payload": {}}"#;
    let signature = sign(event);
    let (status, body) = deliver(event, Some(&signature), MockGateway::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Unhandled event refund.created");

    let garbage = "this is not json";
    let signature = sign(garbage);
    let (status, body) = deliver(garbage, Some(&signature), MockGateway::new(), MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
