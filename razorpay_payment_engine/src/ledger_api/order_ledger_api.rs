use std::fmt::Debug;

use log::*;
use rpg_common::MinorUnits;

use crate::{
    db_types::{CustomerPayment, NewOrder, Order, OrderId, Payment, PaymentId},
    traits::{OrderTransition, PaymentGatewayDatabase, PaymentGatewayError},
};

/// `OrderLedgerApi` owns the lifecycle of an order: `created` -> `paid` -> `refunded`.
///
/// Statuses never move backwards. Asking for a transition the order has already made is a no-op rather than an
/// error, so that retried gateway events are harmless.
pub struct OrderLedgerApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderLedgerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderLedgerApi ({:?})", self.db)
    }
}

impl<B> OrderLedgerApi<B>
where B: PaymentGatewayDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Records a new order in the `created` state. Fails with [`PaymentGatewayError::OrderAlreadyExists`] if the
    /// order id is already known.
    pub async fn create_order(
        &self,
        order_id: OrderId,
        amount: MinorUnits,
        currency: &str,
        receipt: &str,
    ) -> Result<Order, PaymentGatewayError> {
        let order = self.db.insert_order(NewOrder::new(order_id, amount, currency, receipt)).await?;
        info!("📦️ Order [{}] for {} {} recorded", order.order_id, order.amount, order.currency);
        Ok(order)
    }

    pub async fn transition_to_paid(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<OrderTransition, PaymentGatewayError> {
        let transition = self.db.mark_order_paid(order_id, payment_id).await?;
        if transition.changed {
            info!("📦️ Order [{order_id}] is paid");
        } else {
            debug!("📦️ Order [{order_id}] was already {}", transition.order.status);
        }
        Ok(transition)
    }

    pub async fn transition_to_refunded(&self, order_id: &OrderId) -> Result<Order, PaymentGatewayError> {
        let order = self.db.mark_order_refunded(order_id).await?;
        info!("📦️ Order [{order_id}] is refunded");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, PaymentGatewayError> {
        self.db.fetch_order(order_id).await
    }

    /// All orders, newest first
    pub async fn fetch_all_orders(&self) -> Result<Vec<Order>, PaymentGatewayError> {
        self.db.fetch_all_orders().await
    }

    pub async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<Option<Payment>, PaymentGatewayError> {
        self.db.fetch_payment(payment_id).await
    }

    /// Order ids, amounts and contact details for every captured payment, newest first
    pub async fn fetch_customer_payments(&self) -> Result<Vec<CustomerPayment>, PaymentGatewayError> {
        self.db.fetch_captured_payments().await
    }
}
