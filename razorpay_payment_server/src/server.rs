use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::{header, KeepAlive},
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use razorpay_payment_engine::{
    traits::{PaymentGateway, PaymentGatewayDatabase},
    CheckoutApi,
    OrderLedgerApi,
    PaymentReconcilerApi,
    RefundProcessorApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::razorpay::RazorpayGateway,
    routes::{
        api_status,
        health,
        CreateOrderRoute,
        GetAllOrdersRoute,
        GetAllUserDataRoute,
        RefundRoute,
        VerifyPaymentRoute,
        WebhookRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
        info!("🗃️ Database migrations are up to date");
    }
    let gateway = RazorpayGateway::new(config.razorpay.clone()).map_err(|e| {
        ServerError::ConfigurationError(format!("The Razorpay client could not be configured. {e}"))
    })?;
    let srv = create_server_instance(config, db.clone(), gateway)?;
    let result = srv.await.map_err(ServerError::from);
    if let Err(e) = db.close().await {
        warn!("🗃️ Could not close the database cleanly. {e}");
    }
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
) -> Result<Server, ServerError> {
    info!("💻️ Accepting cross-origin requests from {}", config.frontend_url);
    let srv = HttpServer::new(move || {
        let ledger_api = OrderLedgerApi::new(db.clone());
        let reconciler_api = PaymentReconcilerApi::new(
            db.clone(),
            config.razorpay.key_secret.clone(),
            config.webhook_secret.clone(),
        );
        let refund_api = RefundProcessorApi::new(db.clone(), gateway.clone());
        let checkout_api = CheckoutApi::new(db.clone(), gateway.clone(), config.currency.as_str());
        App::new()
            .wrap(cors_policy(&config.frontend_url))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rpg::access_log"))
            .app_data(web::Data::new(ledger_api))
            .app_data(web::Data::new(reconciler_api))
            .app_data(web::Data::new(refund_api))
            .app_data(web::Data::new(checkout_api))
            .configure(configure_routes::<SqliteDatabase, RazorpayGateway>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The browser may call the API from `frontend_url` with credentials. Only `Content-Type` and `Authorization`
/// request headers are allowed.
pub fn cors_policy(frontend_url: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600);
    match frontend_url {
        "*" => cors.allow_any_origin(),
        origin => cors.allowed_origin(origin),
    }
}

/// Registers every route. The API objects the handlers need must already be in the application data.
pub fn configure_routes<B, G>(cfg: &mut web::ServiceConfig)
where
    B: PaymentGatewayDatabase + 'static,
    G: PaymentGateway + 'static,
{
    let api_scope = web::scope("/api")
        .service(CreateOrderRoute::<B, G>::new())
        .service(VerifyPaymentRoute::<B>::new())
        .service(WebhookRoute::<B>::new())
        .service(RefundRoute::<B, G>::new())
        .service(GetAllOrdersRoute::<B>::new())
        .service(GetAllUserDataRoute::<B>::new());
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health)
        .service(api_status)
        .service(api_scope);
}

fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Rejecting request body. {err}");
    ServerError::InvalidRequestBody(err.to_string()).into()
}
