use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use razorpay_payment_engine::{CheckoutError, ReconcileError, RefundError};
use serde_json::json;
use thiserror::Error;

/// Every error that a handler can return. Each variant knows its HTTP status and the JSON body that the front end
/// expects for the route that produces it.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("Failed to create Razorpay order. {0}")]
    OrderCreationFailed(String),
    #[error("Payment verification failed")]
    VerificationFailed,
    #[error("Order not found. {0}")]
    OrderNotFound(String),
    #[error("Payment verification could not be completed. {0}")]
    VerificationError(String),
    #[error("Invalid webhook signature")]
    InvalidWebhookSignature,
    #[error("Malformed webhook payload. {0}")]
    MalformedWebhook(String),
    #[error("Webhook processing failed. {0}")]
    WebhookError(String),
    #[error("Payment not found. {0}")]
    PaymentNotFound(String),
    #[error("Refund not allowed. {0}")]
    RefundNotAllowed(String),
    #[error("The gateway rejected the refund. {0}")]
    RefundRejected(String),
    #[error("Failed to initiate refund. {0}")]
    RefundFailed(String),
    #[error("Failed to fetch {0}")]
    FetchFailed(&'static str),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::OrderCreationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::VerificationFailed => StatusCode::BAD_REQUEST,
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::VerificationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidWebhookSignature => StatusCode::BAD_REQUEST,
            Self::MalformedWebhook(_) => StatusCode::BAD_REQUEST,
            Self::WebhookError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            Self::RefundNotAllowed(_) => StatusCode::BAD_REQUEST,
            Self::RefundRejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RefundFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Datastore and upstream details are logged where the error is raised and never reach the client.
        let body = match self {
            Self::OrderCreationFailed(_) => json!({ "error": "Failed to create Razorpay order" }),
            Self::VerificationFailed => json!({ "status": "verification_failed" }),
            Self::OrderNotFound(_) => json!({ "status": "order_not_found" }),
            Self::VerificationError(_) => json!({ "status": "error", "message": "Payment verification failed" }),
            Self::InvalidWebhookSignature => json!({ "error": "Invalid webhook signature" }),
            Self::MalformedWebhook(_) => json!({ "error": "Malformed webhook payload" }),
            Self::WebhookError(_) => json!({ "error": "Webhook processing failed" }),
            Self::PaymentNotFound(id) => json!({ "message": "Payment not found", "error": id }),
            Self::RefundNotAllowed(reason) => json!({ "message": "Refund not allowed", "error": reason }),
            Self::RefundRejected(reason) => json!({ "message": "Failed to initiate refund", "error": reason }),
            Self::RefundFailed(_) => json!({
                "message": "Failed to initiate refund",
                "error": "The payment gateway could not process the refund",
            }),
            Self::FetchFailed(what) => json!({ "success": false, "error": format!("Failed to fetch {what}") }),
            Self::NoRecordFound(message) => json!({ "success": false, "message": message }),
            Self::InitializeError(_) | Self::ConfigurationError(_) | Self::IOError(_) => {
                json!({ "error": "Internal server error" })
            },
            Self::InvalidRequestBody(_) | Self::InvalidAmount(_) => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::InvalidAmount(s) => Self::InvalidAmount(s),
            CheckoutError::UpstreamError(s) => Self::OrderCreationFailed(s),
            CheckoutError::DatabaseError(s) => Self::OrderCreationFailed(format!("Database error: {s}")),
        }
    }
}

impl From<ReconcileError> for ServerError {
    fn from(e: ReconcileError) -> Self {
        match e {
            ReconcileError::InvalidSignature => Self::VerificationFailed,
            ReconcileError::OrderNotFound(id) => Self::OrderNotFound(id.to_string()),
            ReconcileError::MalformedPayload(s) => Self::InvalidRequestBody(s),
            ReconcileError::DatabaseError(s) => Self::VerificationError(s),
        }
    }
}

impl From<RefundError> for ServerError {
    fn from(e: RefundError) -> Self {
        match e {
            RefundError::PaymentNotFound(id) => Self::PaymentNotFound(id.to_string()),
            e @ RefundError::PaymentNotRefundable { .. } => Self::RefundNotAllowed(e.to_string()),
            RefundError::InvalidAmount(s) => Self::InvalidAmount(s),
            RefundError::RefundRejected(s) => Self::RefundRejected(s),
            RefundError::UpstreamError(s) => Self::RefundFailed(s),
            RefundError::DatabaseError(s) => Self::RefundFailed(format!("Database error: {s}")),
        }
    }
}

/// Webhook failures get their own mapping, since the gateway reads the status code to decide whether to retry.
pub fn webhook_error(e: ReconcileError) -> ServerError {
    match e {
        ReconcileError::InvalidSignature => ServerError::InvalidWebhookSignature,
        ReconcileError::MalformedPayload(s) => ServerError::MalformedWebhook(s),
        e => ServerError::WebhookError(e.to_string()),
    }
}
