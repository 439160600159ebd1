use actix_web::http::StatusCode;
use serde_json::Value;

use super::{
    helpers::{configure, get_request},
    mocks::{MockGateway, MockStore},
};

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    for path in ["/health", "/api/health"] {
        let (status, body) = get_request(path, configure(MockGateway::new(), MockStore::new())).await;
        assert_eq!(status, StatusCode::OK);
        let body = serde_json::from_str::<Value>(&body).expect("Health check should return JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }
}
