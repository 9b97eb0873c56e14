//! `SqliteDatabase` is a concrete implementation of a Razorpay payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements [`PaymentGatewayDatabase`].
use std::fmt::Debug;

use log::*;
use rpg_common::MinorUnits;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{new_pool, orders, payments, refunds};
use crate::{
    db_types::{
        CustomerPayment,
        NewOrder,
        NewPayment,
        NewRefund,
        Order,
        OrderId,
        Payment,
        PaymentId,
        PaymentStatus,
        Refund,
    },
    traits::{OrderTransition, PaymentGatewayDatabase, PaymentGatewayError, RecordedRefund},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl PaymentGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_all_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn mark_order_paid(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<OrderTransition, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        orders::transition_to_paid(order_id, payment_id, &mut conn).await
    }

    async fn mark_order_refunded(&self, order_id: &OrderId) -> Result<Order, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        orders::transition_to_refunded(order_id, &mut conn).await
    }

    async fn upsert_payment(&self, payment: NewPayment) -> Result<Payment, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        payments::upsert_payment(payment, &mut conn).await
    }

    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<Option<Payment>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::fetch_payment(payment_id, &mut conn).await?;
        Ok(payment)
    }

    async fn fetch_captured_payments(&self) -> Result<Vec<CustomerPayment>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let payments = payments::fetch_captured_payments(&mut conn).await?;
        Ok(payments)
    }

    async fn confirm_order_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<(OrderTransition, Payment), PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let transition = orders::transition_to_paid(order_id, payment_id, &mut tx).await?;
        let order = &transition.order;
        let status = match &order.payment_id {
            Some(paid_by) if paid_by != payment_id => {
                warn!(
                    "🗃️ Order [{order_id}] was already paid by payment {paid_by}. Payment {payment_id} is recorded, \
                     but not as captured"
                );
                PaymentStatus::Authorized
            },
            _ => PaymentStatus::Captured,
        };
        let payment = NewPayment::new(payment_id.clone(), order.amount, order.currency.clone(), status)
            .with_order_id(order_id.clone());
        let payment = payments::upsert_payment(payment, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Payment {payment_id} confirmed for order [{order_id}]. Order changed: {}", transition.changed);
        Ok((transition, payment))
    }

    async fn process_captured_payment(
        &self,
        payment: NewPayment,
    ) -> Result<(Option<OrderTransition>, Payment), PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let payment_id = payment.payment_id.clone();
        let order_id = payment.order_id.clone();
        let new_order = order_id
            .as_ref()
            .map(|oid| NewOrder::new(oid.clone(), payment.amount, payment.currency.clone(), String::default()));
        let stored = payments::upsert_payment(payment, &mut tx).await?;
        let transition = match new_order {
            Some(new_order) => {
                let order_id = new_order.order_id.clone();
                let transition = match orders::transition_to_paid(&order_id, &payment_id, &mut tx).await {
                    Err(PaymentGatewayError::OrderNotFound(_)) => {
                        info!("🗃️ Order [{order_id}] is not known locally. Creating it from payment {payment_id}");
                        match orders::insert_paid_order(new_order, &payment_id, &mut tx).await? {
                            Some(order) => OrderTransition::changed(order),
                            None => orders::transition_to_paid(&order_id, &payment_id, &mut tx).await?,
                        }
                    },
                    result => result?,
                };
                Some(transition)
            },
            None => {
                warn!("🗃️ Captured payment {payment_id} has no order id. It cannot be linked to an order.");
                None
            },
        };
        tx.commit().await?;
        Ok((transition, stored))
    }

    async fn fetch_refunds_for_payment(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let refunds = refunds::fetch_refunds_for_payment(payment_id, &mut conn).await?;
        Ok(refunds)
    }

    async fn total_refunded(&self, payment_id: &PaymentId) -> Result<MinorUnits, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let total = refunds::total_refunded(payment_id, &mut conn).await?;
        Ok(total)
    }

    async fn record_refund(&self, refund: NewRefund) -> Result<RecordedRefund, PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let payment = payments::fetch_payment(&refund.payment_id, &mut tx)
            .await?
            .ok_or_else(|| PaymentGatewayError::PaymentNotFound(refund.payment_id.clone()))?;
        let refund = refunds::insert_refund(refund, &mut tx).await?;
        let total = refunds::total_refunded(&payment.payment_id, &mut tx).await?;
        trace!("🗃️ Payment {} has {total} of {} refunded", payment.payment_id, payment.amount);
        let mut closed_order = None;
        let payment = if total >= payment.amount {
            if total > payment.amount {
                warn!(
                    "🗃️ Refunds on payment {} total {total}, which exceeds the captured amount of {}",
                    payment.payment_id, payment.amount
                );
            }
            let update = NewPayment::new(
                payment.payment_id.clone(),
                payment.amount,
                payment.currency.clone(),
                PaymentStatus::Refunded,
            );
            let updated = payments::upsert_payment(update, &mut tx).await?;
            if let Some(order_id) = &updated.order_id {
                match orders::transition_to_refunded(order_id, &mut tx).await {
                    Ok(order) => closed_order = Some(order),
                    Err(e @ PaymentGatewayError::InvalidTransition { .. })
                    | Err(e @ PaymentGatewayError::OrderNotFound(_)) => {
                        warn!("🗃️ Order [{order_id}] was not closed after its payment was refunded in full. {e}");
                    },
                    Err(e) => return Err(e),
                }
            }
            updated
        } else {
            payment
        };
        tx.commit().await?;
        Ok(RecordedRefund { refund, payment, closed_order })
    }

    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
