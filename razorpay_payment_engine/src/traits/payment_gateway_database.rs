use rpg_common::MinorUnits;
use thiserror::Error;

use crate::{
    db_types::{
        CustomerPayment,
        NewOrder,
        NewPayment,
        NewRefund,
        Order,
        OrderId,
        OrderStatusType,
        Payment,
        PaymentId,
        Refund,
    },
    traits::{OrderTransition, RecordedRefund},
};

/// This trait defines the behaviour for backends supporting the Razorpay payment engine.
///
/// Order status changes are conditional on the current status, and payments are merged rather than overwritten, so
/// every method is safe to call repeatedly with the same arguments.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new order with status `created`.
    ///
    /// Fails with [`PaymentGatewayError::OrderAlreadyExists`] if the order id is already known.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, PaymentGatewayError>;

    /// All orders, newest first.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, PaymentGatewayError>;

    /// Moves a `created` order to `paid` and links it to the payment. Orders that are already paid or refunded are
    /// returned as-is.
    async fn mark_order_paid(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<OrderTransition, PaymentGatewayError>;

    /// Moves a `paid` order to `refunded`. Any other starting status is an
    /// [`PaymentGatewayError::InvalidTransition`].
    async fn mark_order_refunded(&self, order_id: &OrderId) -> Result<Order, PaymentGatewayError>;

    /// Merges the payment into the ledger. The stored status only ever moves forward, and stored contact details
    /// are never overwritten.
    async fn upsert_payment(&self, payment: NewPayment) -> Result<Payment, PaymentGatewayError>;

    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<Option<Payment>, PaymentGatewayError>;

    /// Contact details for every captured payment, newest first.
    async fn fetch_captured_payments(&self) -> Result<Vec<CustomerPayment>, PaymentGatewayError>;

    /// In a single atomic transaction,
    /// * marks the order as paid (see [`Self::mark_order_paid`]),
    /// * merges a `captured` payment for the order amount into the ledger.
    ///
    /// If the order was already paid by a different payment, the new payment is merged as `authorized` instead, so
    /// that the order never carries two refundable payments.
    ///
    /// Fails with [`PaymentGatewayError::OrderNotFound`] if the order does not exist, in which case nothing is
    /// written.
    async fn confirm_order_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<(OrderTransition, Payment), PaymentGatewayError>;

    /// In a single atomic transaction,
    /// * merges the captured payment into the ledger,
    /// * marks its order as paid. If the order is unknown locally, it is created directly in the `paid` state from
    ///   the payment details.
    ///
    /// Payments without an order id are stored, and `None` is returned for the order.
    async fn process_captured_payment(
        &self,
        payment: NewPayment,
    ) -> Result<(Option<OrderTransition>, Payment), PaymentGatewayError>;

    async fn fetch_refunds_for_payment(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, PaymentGatewayError>;

    /// The sum of all refunds recorded against the payment.
    async fn total_refunded(&self, payment_id: &PaymentId) -> Result<MinorUnits, PaymentGatewayError>;

    /// In a single atomic transaction,
    /// * stores the refund,
    /// * if the payment has now been refunded in full, marks the payment as refunded and moves its order to
    ///   `refunded`.
    ///
    /// Fails with [`PaymentGatewayError::PaymentNotFound`] if the payment does not exist, and
    /// [`PaymentGatewayError::RefundAlreadyExists`] if the refund id has been seen before.
    async fn record_refund(&self, refund: NewRefund) -> Result<RecordedRefund, PaymentGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Cannot insert order, since it already exists with id {0}")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested payment {0} does not exist")]
    PaymentNotFound(PaymentId),
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition { order_id: OrderId, from: OrderStatusType, to: OrderStatusType },
    #[error("Cannot insert refund, since it already exists with id {0}")]
    RefundAlreadyExists(String),
}

impl From<sqlx::Error> for PaymentGatewayError {
    fn from(e: sqlx::Error) -> Self {
        PaymentGatewayError::DatabaseError(e.to_string())
    }
}
