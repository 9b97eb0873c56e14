use std::fmt::Debug;

use chrono::Utc;
use log::*;
use rand::Rng;
use rpg_common::MinorUnits;

use crate::{
    db_types::NewOrder,
    ledger_api::errors::CheckoutError,
    traits::{GatewayOrder, PaymentGateway, PaymentGatewayDatabase, PaymentGatewayError},
};

/// `CheckoutApi` opens new orders at the gateway. The client then runs the checkout widget against the returned
/// gateway order id.
pub struct CheckoutApi<B, G> {
    db: B,
    gateway: G,
    currency: String,
}

impl<B, G> Debug for CheckoutApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({})", self.currency)
    }
}

impl<B, G> CheckoutApi<B, G>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
{
    pub fn new<S: Into<String>>(db: B, gateway: G, currency: S) -> Self {
        Self { db, gateway, currency: currency.into() }
    }

    /// Creates an order for `amount` at the gateway and records it locally with status `created`.
    pub async fn create_order(&self, amount: MinorUnits) -> Result<GatewayOrder, CheckoutError> {
        if !amount.is_positive() {
            return Err(CheckoutError::InvalidAmount(format!("Orders must be for a positive amount, not {amount}")));
        }
        let receipt = new_receipt();
        debug!("🧾️ Creating gateway order for {amount} {} with receipt {receipt}", self.currency);
        let order = self.gateway.create_order(amount, &self.currency, &receipt).await.map_err(|e| {
            warn!("🧾️ Could not create a gateway order for receipt {receipt}. {e}");
            CheckoutError::from(e)
        })?;
        let new_order = NewOrder::new(order.id.clone(), order.amount, order.currency.clone(), order.receipt.clone());
        match self.db.insert_order(new_order).await {
            Ok(o) => info!("🧾️ Order [{}] created for {} {}", o.order_id, o.amount, o.currency),
            Err(PaymentGatewayError::OrderAlreadyExists(id)) => warn!("🧾️ Order [{id}] was already recorded"),
            Err(e) => {
                error!("🧾️ Gateway order [{}] was created, but could not be recorded. {e}", order.id);
                return Err(e.into());
            },
        }
        Ok(order)
    }
}

/// `receipt_<unix millis>_<6 random digits>`. Razorpay limits receipts to 40 characters.
pub fn new_receipt() -> String {
    let nonce = rand::thread_rng().gen_range(0..1_000_000);
    format!("receipt_{}_{nonce:06}", Utc::now().timestamp_millis())
}
