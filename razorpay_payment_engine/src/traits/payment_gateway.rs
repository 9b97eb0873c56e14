use rpg_common::MinorUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{OrderId, PaymentId, RefundId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: OrderId,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRefund {
    pub id: RefundId,
    pub payment_id: PaymentId,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway understood the request and refused it. Retrying the same request will not help.
    #[error("The payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not complete the request to the payment gateway: {0}")]
    Transport(String),
    #[error("The payment gateway sent a response we could not understand: {0}")]
    InvalidResponse(String),
}

/// Outbound calls to the remote payment provider.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn create_order(
        &self,
        amount: MinorUnits,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError>;

    async fn create_refund(&self, payment_id: &PaymentId, amount: MinorUnits) -> Result<GatewayRefund, GatewayError>;
}
