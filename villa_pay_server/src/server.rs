use std::time::Duration;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::Logger,
    web,
    web::ServiceConfig,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use razorpay_tools::signature::WEBHOOK_SIGNATURE_HEADER;
use villa_pay_engine::{
    traits::{BookingStore, PaymentGateway},
    PaymentFlowApi,
};
use vp_common::Secret;

use crate::{
    config::ServerConfig,
    errors::{expose_debug_info, ServerError},
    integrations::{
        booking_events::create_booking_event_handlers,
        notion::NotionBookingStore,
        razorpay::RazorpayGateway,
    },
    middleware::HmacMiddlewareFactory,
    reconciliation_worker::start_reconciliation_worker,
    routes::{health, CreateOrderRoute, RazorpayWebhookRoute, VerifyPaymentRoute},
};

/// Settings for the webhook scope.
#[derive(Clone, Debug)]
pub struct WebhookGuard {
    pub secret: Secret<String>,
    pub hmac_checks: bool,
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let gateway = RazorpayGateway::new(config.razorpay.clone()).map_err(|e| {
        error!("💳️ Could not set up the Razorpay client. {e}");
        ServerError::InitializeError(e.to_string())
    })?;
    let store = NotionBookingStore::new(config.notion.clone()).map_err(|e| {
        error!("📒️ Could not set up the Notion client. {e}");
        ServerError::InitializeError(e.to_string())
    })?;
    let handlers = create_booking_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    if config.reconciliation.enabled {
        let reconciliation = config.reconciliation.clone();
        let _worker = start_reconciliation_worker(gateway.clone(), store.clone(), producers.clone(), reconciliation);
    } else {
        warn!("🕰️ The reconciliation worker is disabled. Abandoned bookings will stay pending.");
    }
    let api = web::Data::new(PaymentFlowApi::new(gateway, store, producers));
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    api: web::Data<PaymentFlowApi<RazorpayGateway, NotionBookingStore>>,
) -> Result<Server, ServerError> {
    expose_debug_info(!config.is_production());
    let webhook =
        WebhookGuard { secret: config.razorpay.webhook_secret.clone(), hmac_checks: config.webhook_hmac_checks };
    let srv = HttpServer::new(move || {
        let api = api.clone();
        let webhook = webhook.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vps::access_log"))
            .configure(move |cfg| configure_app(cfg, api, webhook))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Registers the payment routes, under `/api`, and the health check on the given service config.
///
/// The webhook scope sits behind the HMAC middleware. Malformed JSON bodies on the other routes are turned into
/// [`ServerError::InvalidRequestBody`].
pub fn configure_app<G, S>(cfg: &mut ServiceConfig, api: web::Data<PaymentFlowApi<G, S>>, webhook: WebhookGuard)
where
    G: PaymentGateway + 'static,
    S: BookingStore + 'static,
{
    let json_config = web::JsonConfig::default().error_handler(json_error_handler);
    let webhook_scope = web::scope("/payments/webhook")
        .wrap(HmacMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, webhook.secret, webhook.hmac_checks))
        .service(RazorpayWebhookRoute::<G, S>::new());
    let api_scope = web::scope("/api")
        .app_data(json_config)
        .service(webhook_scope)
        .service(CreateOrderRoute::<G, S>::new())
        .service(VerifyPaymentRoute::<G, S>::new())
        .service(health);
    cfg.app_data(api).service(health).service(api_scope);
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Rejected request body. {err}");
    ServerError::InvalidRequestBody(err.to_string()).into()
}
