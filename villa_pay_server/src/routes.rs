//! Request handler definitions
//!
//! Define each route and its handler here. The handlers only translate between HTTP and the booking flows in
//! [`PaymentFlowApi`]; anything longer than a few lines belongs in the engine.
//!
//! A note about performance:
//! Each worker thread processes its requests sequentially, so a handler that blocks the thread stalls every request
//! queued on that worker. Every call to Razorpay or Notion is awaited, which lets the worker get on with other
//! requests in the meantime:
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use razorpay_tools::WebhookEvent;
use villa_pay_engine::{
    traits::{BookingStore, PaymentGateway},
    validation::CheckoutInput,
    NotificationOutcome,
    PaymentConfirmation,
    PaymentFlowApi,
};

use crate::{
    data_objects::{
        CreateOrderRequest,
        CreateOrderResponse,
        HealthResponse,
        JsonResponse,
        VerifyPaymentRequest,
        VerifyPaymentResponse,
    },
    errors::ServerError,
    integrations::razorpay::notification_from_webhook,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(HealthResponse::ok())
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_order => Post "/payments/orders" impl PaymentGateway, BookingStore);
/// Route handler for starting a checkout.
///
/// The booking is validated and recorded as `Pending` before the Razorpay order is created. The response carries
/// everything the browser needs to open the Razorpay checkout widget, plus the booking id, which it must send back to
/// `/payments/verify`.
pub async fn create_order<G, S>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<PaymentFlowApi<G, S>>,
) -> Result<HttpResponse, ServerError>
where
    G: PaymentGateway,
    S: BookingStore,
{
    trace!("💻️ Received create order request");
    let input = CheckoutInput::from(body.into_inner());
    let result = api.create_checkout(&input).await?;
    info!("💻️ Checkout opened. Booking {} is paid through order {}", result.booking.id, result.order.id);
    Ok(HttpResponse::Ok().json(CreateOrderResponse::from(result)))
}

//----------------------------------------------   Verification  -------------------------------------------------
route!(verify_payment => Post "/payments/verify" impl PaymentGateway, BookingStore);
/// Route handler for the payment confirmation the browser sends once the Razorpay widget closes.
///
/// A signature mismatch is reported as a 400. The booking update that follows a good signature is best-effort, so
/// a successful response only means that the payment itself was genuine.
pub async fn verify_payment<G, S>(
    body: web::Json<VerifyPaymentRequest>,
    api: web::Data<PaymentFlowApi<G, S>>,
) -> Result<HttpResponse, ServerError>
where
    G: PaymentGateway,
    S: BookingStore,
{
    trace!("💻️ Received payment verification request");
    let confirmation = PaymentConfirmation::from(body.into_inner());
    let result = api.verify_and_confirm(&confirmation).await?;
    if !result.verified {
        debug!("💻️ Payment {} for order {} could not be verified", result.payment_id, result.order_id);
        return Err(ServerError::VerificationFailed);
    }
    Ok(HttpResponse::Ok().json(VerifyPaymentResponse::from(result)))
}

//----------------------------------------------   Webhooks  ----------------------------------------------------
route!(razorpay_webhook => Post "" impl PaymentGateway, BookingStore);
/// Route handler for Razorpay webhooks.
///
/// The signature has been checked by [`crate::middleware::HmacMiddlewareFactory`] by the time this runs. From then on
/// the delivery is always acknowledged with a 200, since a retry from Razorpay would not change the outcome.
pub async fn razorpay_webhook<G, S>(
    body: web::Bytes,
    api: web::Data<PaymentFlowApi<G, S>>,
) -> Result<HttpResponse, ServerError>
where
    G: PaymentGateway,
    S: BookingStore,
{
    trace!("💻️ Received Razorpay webhook");
    let event = match serde_json::from_slice::<WebhookEvent>(body.as_ref()) {
        Ok(event) => event,
        Err(e) => {
            warn!("💻️ Could not read Razorpay webhook payload. {e}");
            return Ok(HttpResponse::Ok().json(JsonResponse::success("Webhook payload was not understood")));
        },
    };
    debug!("💻️ Razorpay webhook: {}", event.event);
    let notification = notification_from_webhook(&event);
    let message = match api.handle_notification(&notification).await {
        NotificationOutcome::Completed(id) => format!("Booking {id} completed"),
        NotificationOutcome::Failed(id) => format!("Booking {id} marked as failed"),
        NotificationOutcome::Ignored(reason) => reason,
    };
    info!("💻️ Razorpay {} webhook handled. {message}", event.event);
    Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
}
