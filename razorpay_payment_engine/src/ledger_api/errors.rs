use thiserror::Error;

use crate::{
    db_types::{OrderId, PaymentId, PaymentStatus},
    traits::{GatewayError, PaymentGatewayError},
};

#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    #[error("The payment signature is invalid")]
    InvalidSignature,
    #[error("The webhook payload could not be understood: {0}")]
    MalformedPayload(String),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PaymentGatewayError> for ReconcileError {
    fn from(e: PaymentGatewayError) -> Self {
        match e {
            PaymentGatewayError::OrderNotFound(id) => Self::OrderNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum RefundError {
    #[error("The payment {0} does not exist")]
    PaymentNotFound(PaymentId),
    #[error("Payment {payment_id} cannot be refunded, because it is {status}")]
    PaymentNotRefundable { payment_id: PaymentId, status: PaymentStatus },
    #[error("Invalid refund amount. {0}")]
    InvalidAmount(String),
    #[error("The gateway rejected the refund: {0}")]
    RefundRejected(String),
    #[error("The refund could not be completed at the gateway: {0}")]
    UpstreamError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PaymentGatewayError> for RefundError {
    fn from(e: PaymentGatewayError) -> Self {
        match e {
            PaymentGatewayError::PaymentNotFound(id) => Self::PaymentNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<GatewayError> for RefundError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Rejected { message, .. } => Self::RefundRejected(message),
            e => Self::UpstreamError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Invalid order amount. {0}")]
    InvalidAmount(String),
    #[error("The order could not be created at the gateway: {0}")]
    UpstreamError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PaymentGatewayError> for CheckoutError {
    fn from(e: PaymentGatewayError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<GatewayError> for CheckoutError {
    fn from(e: GatewayError) -> Self {
        Self::UpstreamError(e.to_string())
    }
}
