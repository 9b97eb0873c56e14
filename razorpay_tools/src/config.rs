use log::*;
use rpg_common::Secret;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Base URL for the REST API, without a trailing slash.
    pub api_url: String,
    pub key_id: String,
    pub key_secret: Secret<String>,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_RAZORPAY_API_URL.to_string(), key_id: String::default(), key_secret: Secret::default() }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("RPG_RAZORPAY_API_URL").unwrap_or_else(|_| {
            debug!("RPG_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL} as default");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let key_id = std::env::var("RPG_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("RPG_RAZORPAY_KEY_ID not set. Calls to the Razorpay API will fail.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("RPG_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("RPG_RAZORPAY_KEY_SECRET not set. Calls to the Razorpay API will fail.");
            String::default()
        }));
        Self { api_url: api_url.trim_end_matches('/').to_string(), key_id, key_secret }
    }
}
