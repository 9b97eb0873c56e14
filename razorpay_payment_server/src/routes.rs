//! Request handler definitions
//!
//! Define each route and its handler here. The handlers only translate between HTTP and the engine APIs; all
//! ledger logic lives in `razorpay_payment_engine`.
//!
//! Since each worker thread processes its requests sequentially, handlers must not block the current thread.
//! Database and gateway calls are all expressed as futures, so a slow Razorpay response only parks the request that
//! is waiting on it.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use razorpay_payment_engine::{
    traits::{PaymentGateway, PaymentGatewayDatabase},
    webhook_objects::{ClientPaymentConfirmation, WebhookOutcome},
    CheckoutApi,
    OrderLedgerApi,
    PaymentReconcilerApi,
    ReconcileError,
    RefundProcessorApi,
};
use serde_json::json;

use crate::{
    data_objects::{parse_major_amount, CreateOrderParams, RefundParams},
    errors::{webhook_error, ServerError},
};

/// The header Razorpay uses to carry the HMAC of a webhook body
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

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
    HttpResponse::Ok().body("👍️\n")
}

#[get("/api")]
pub async fn api_status() -> impl Responder {
    trace!("💻️ Received API status request");
    HttpResponse::Ok().json(json!({ "status": "Ok" }))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_order => Post "/create-order" impl PaymentGatewayDatabase, PaymentGateway);
/// Opens an order at Razorpay for the given amount (in major units) and records it locally in the `created` state.
/// The response is the gateway order, which the front end hands to the checkout widget.
pub async fn create_order<B, G>(
    body: web::Json<CreateOrderParams>,
    api: web::Data<CheckoutApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
{
    trace!("💻️ Received create-order request for {}", body.amount);
    let amount = parse_major_amount(&body.amount)?;
    let order = api.create_order(amount).await.map_err(|e| {
        error!("💻️ Could not create an order for {amount}. {e}");
        ServerError::from(e)
    })?;
    debug!("💻️ Order {} created for {}", order.id, order.amount);
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Reconciliation  ----------------------------------------------
route!(verify_payment => Post "/verify-payment" impl PaymentGatewayDatabase);
/// The checkout widget's success callback, forwarded by the front end.
///
/// The signature is checked against the API key secret before anything is written. A valid confirmation marks the
/// order paid and records the payment as captured. Repeating the call is harmless.
pub async fn verify_payment<B: PaymentGatewayDatabase>(
    body: web::Json<ClientPaymentConfirmation>,
    api: web::Data<PaymentReconcilerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let confirmation = body.into_inner();
    trace!(
        "💻️ Received payment verification for order {} / payment {}",
        confirmation.razorpay_order_id,
        confirmation.razorpay_payment_id
    );
    let result = api.verify_client_payment(confirmation).await.map_err(|e| {
        match &e {
            ReconcileError::DatabaseError(_) => error!("💻️ Payment verification failed. {e}"),
            _ => debug!("💻️ Payment verification refused. {e}"),
        }
        ServerError::from(e)
    })?;
    debug!("💻️ Order {} is {} after verification", result.order.order_id, result.order.status);
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

route!(webhook => Post "/webhook" impl PaymentGatewayDatabase);
/// Razorpay webhook deliveries.
///
/// The body is taken as raw bytes, because the signature covers the exact bytes Razorpay sent. Every outcome that
/// the ledger understands (including events we ignore) is acknowledged with a 200 so that Razorpay does not
/// redeliver it. Datastore failures return a 500, which Razorpay retries.
pub async fn webhook<B: PaymentGatewayDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentReconcilerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received webhook delivery ({} bytes)", body.len());
    let signature = req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_else(|| {
        debug!("💻️ Webhook delivery has no usable {SIGNATURE_HEADER} header");
        ""
    });
    let outcome = api.process_webhook(&body, signature).await.map_err(|e| {
        warn!("💻️ Webhook delivery was not processed. {e}");
        webhook_error(e)
    })?;
    let status = match outcome {
        WebhookOutcome::Processed { .. } => "success",
        WebhookOutcome::Ignored { .. } => "ignored",
    };
    let message = outcome.message();
    info!("💻️ Webhook: {message}");
    Ok(HttpResponse::Ok().json(json!({ "status": status, "message": message })))
}

//----------------------------------------------   Refunds  ----------------------------------------------------
route!(refund => Post "/refund" impl PaymentGatewayDatabase, PaymentGateway);
/// Refunds part or all of a captured payment. The amount is in major units.
pub async fn refund<B, G>(
    body: web::Json<RefundParams>,
    api: web::Data<RefundProcessorApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
{
    let RefundParams { payment_id, amount } = body.into_inner();
    trace!("💻️ Received refund request for {amount} on payment {payment_id}");
    let amount = parse_major_amount(&amount)?;
    let recorded = api.refund(&payment_id, amount).await.map_err(|e| {
        warn!("💻️ Refund of {amount} on payment {payment_id} failed. {e}");
        ServerError::from(e)
    })?;
    debug!("💻️ Refund {} recorded for payment {payment_id}", recorded.refund.refund_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Refund initiated successfully", "refund": recorded.refund })))
}

//----------------------------------------------   Reporting  ----------------------------------------------------
route!(get_all_orders => Get "/getAllOrders" impl PaymentGatewayDatabase);
/// Every order in the ledger, newest first
pub async fn get_all_orders<B: PaymentGatewayDatabase>(
    api: web::Data<OrderLedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received request for all orders");
    let orders = api.fetch_all_orders().await.map_err(|e| {
        error!("💻️ Could not fetch orders. {e}");
        ServerError::FetchFailed("orders")
    })?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": orders })))
}

route!(get_all_user_data => Get "/getAllUserData" impl PaymentGatewayDatabase);
/// Order ids, amounts and contact details for every captured payment
pub async fn get_all_user_data<B: PaymentGatewayDatabase>(
    api: web::Data<OrderLedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received request for customer payment data");
    let payments = api.fetch_customer_payments().await.map_err(|e| {
        error!("💻️ Could not fetch customer payments. {e}");
        ServerError::FetchFailed("customer data")
    })?;
    if payments.is_empty() {
        return Err(ServerError::NoRecordFound("No captured payments found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": payments })))
}
