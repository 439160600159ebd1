use actix_web::{body::to_bytes, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;
use villa_pay_engine::{events::EventProducers, PaymentFlowApi};
use vp_common::Secret;

use super::mocks::{MockGateway, MockStore};
use crate::server::{configure_app, WebhookGuard};

pub const WEBHOOK_SECRET: &str = "whsec_test_only";

/// Wires the real routes up to the given doubles.
pub fn configure(gateway: MockGateway, store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    let api = web::Data::new(PaymentFlowApi::new(gateway, store, EventProducers::default()));
    let webhook = WebhookGuard { secret: Secret::new(WEBHOOK_SECRET.to_string()), hmac_checks: true };
    move |cfg| configure_app(cfg, api, webhook)
}

pub async fn get_request(path: &str, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let req = TestRequest::get().uri(path).to_request();
    send(req, configure).await
}

pub async fn post_request(
    path: &str,
    body: &str,
    headers: &[(&str, &str)],
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).insert_header(("Content-Type", "application/json"));
    for &(name, value) in headers {
        req = req.insert_header((name, value));
    }
    let req = req.set_payload(body.to_string()).to_request();
    send(req, configure).await
}

pub async fn post_json(path: &str, body: &str, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    post_request(path, body, &[], configure).await
}

async fn send(req: actix_http::Request, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    // Errors raised by middleware reach us as errors rather than responses
    let res = match test::try_call_service(&service, req).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = to_bytes(res.into_body()).await.expect("Could not read response body");
    (status, String::from_utf8_lossy(&body).into_owned())
}
