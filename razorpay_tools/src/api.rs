use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{ErrorResponse, NewRazorpayOrder, NewRazorpayRefund, RazorpayOrder, RazorpayRefund},
    RazorpayApiError,
};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        if config.key_id.is_empty() || config.key_secret.is_empty() {
            return Err(RazorpayApiError::Initialization("Razorpay key id and secret must both be set".into()));
        }
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("💳️ Sending REST query: {method} {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
            let message = error_description(&text);
            debug!("💳️ Razorpay returned {status}: {text}");
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    pub fn key_id(&self) -> &str {
        self.config.key_id.as_str()
    }

    pub async fn create_order(&self, order: &NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError> {
        debug!("💳️ Creating Razorpay order for {} {} ({})", order.amount, order.currency, order.receipt);
        let result = self.rest_query::<RazorpayOrder, _>(Method::POST, "/orders", Some(order)).await?;
        info!("💳️ Created Razorpay order {} for receipt {}", result.id, order.receipt);
        Ok(result)
    }

    pub async fn create_refund(
        &self,
        payment_id: &str,
        refund: &NewRazorpayRefund,
    ) -> Result<RazorpayRefund, RazorpayApiError> {
        let path = format!("/payments/{payment_id}/refund");
        debug!("💳️ Requesting refund of {} on payment {payment_id}", refund.amount);
        let result = self.rest_query::<RazorpayRefund, _>(Method::POST, &path, Some(refund)).await?;
        info!("💳️ Refund {} ({}) issued on payment {payment_id}", result.id, result.status);
        Ok(result)
    }
}

/// Razorpay wraps failures as `{"error": {"code": .., "description": ..}}`. Fall back to the raw body if the
/// response doesn't look like that.
fn error_description(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => match (error.description, error.code) {
            (Some(d), _) => d,
            (None, Some(c)) => c,
            (None, None) => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}
