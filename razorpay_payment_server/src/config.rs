use std::env;

use actix_web::http::Uri;
use log::*;
use razorpay_tools::RazorpayConfig;
use rpg_common::{helpers::parse_boolean_flag, Secret, DEFAULT_CURRENCY_CODE};

const DEFAULT_RPG_HOST: &str = "127.0.0.1";
const DEFAULT_RPG_PORT: u16 = 4000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/razorpay_store.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// If true, pending schema migrations are applied when the server starts.
    pub run_migrations: bool,
    /// The currency that new orders are opened in
    pub currency: String,
    /// Credentials and endpoint for outbound calls to the Razorpay API. The key secret also verifies checkout
    /// signatures.
    pub razorpay: RazorpayConfig,
    /// The secret configured for webhooks in the Razorpay dashboard. It is distinct from the API key secret.
    pub webhook_secret: Secret<String>,
    /// The origin the storefront is served from. Browsers may only call the API cross-origin from here. `*` allows
    /// any origin.
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPG_HOST.to_string(),
            port: DEFAULT_RPG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            run_migrations: true,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            razorpay: RazorpayConfig::default(),
            webhook_secret: Secret::default(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RPG_HOST").ok().unwrap_or_else(|| DEFAULT_RPG_HOST.into());
        let port = env::var("RPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RPG_PORT. {e} Using the default, {DEFAULT_RPG_PORT}, instead."
                    );
                    DEFAULT_RPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RPG_PORT);
        let database_url = env::var("RPG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ RPG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let db_max_connections = env::var("RPG_DB_MAX_CONNECTIONS")
            .map_err(|_| debug!("🪛️ RPG_DB_MAX_CONNECTIONS is not set. Using {DEFAULT_DB_MAX_CONNECTIONS}."))
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for RPG_DB_MAX_CONNECTIONS. {e}"))
            })
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("RPG_RUN_MIGRATIONS").ok(), true);
        let currency = env::var("RPG_CURRENCY")
            .ok()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let webhook_secret = Secret::new(env::var("RPG_RAZORPAY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ RPG_RAZORPAY_WEBHOOK_SECRET is not set. Every webhook delivery will be rejected until it is \
                 configured."
            );
            String::default()
        }));
        let frontend_url = env::var("RPG_FRONTEND_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| valid_origin(s))
            .unwrap_or_else(|| {
                warn!("🪛️ RPG_FRONTEND_URL is not set or is invalid. Allowing requests from {DEFAULT_FRONTEND_URL}.");
                DEFAULT_FRONTEND_URL.to_string()
            });
        Self {
            host,
            port,
            database_url,
            db_max_connections,
            run_migrations,
            currency,
            razorpay,
            webhook_secret,
            frontend_url,
        }
    }
}

/// True for `*` or an absolute `scheme://host[:port]` origin
fn valid_origin(origin: &str) -> bool {
    if origin == "*" {
        return true;
    }
    origin
        .parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.host().is_some() && uri.path() == "/" && uri.query().is_none())
        .unwrap_or(false)
}
