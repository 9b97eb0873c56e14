use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, PaymentId},
    sqlite::db::is_unique_violation,
    traits::{OrderTransition, PaymentGatewayError},
};

/// Inserts a new order with status `created`. This is not atomic. You can embed this call inside a transaction if
/// you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentGatewayError> {
    let order_id = order.order_id.clone();
    let result: Result<Order, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, amount, currency, receipt, status)
            VALUES ($1, $2, $3, $4, 'created')
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.amount)
    .bind(order.currency)
    .bind(order.receipt)
    .fetch_one(conn)
    .await;
    match result {
        Ok(order) => {
            debug!("🗃️ Order [{}] inserted with id {}", order.order_id, order.id);
            Ok(order)
        },
        Err(e) if is_unique_violation(&e) => Err(PaymentGatewayError::OrderAlreadyExists(order_id)),
        Err(e) => Err(e.into()),
    }
}

/// Inserts an order that is already paid for. This is used when the gateway reports a captured payment for an order
/// we have no record of.
///
/// Returns `None` if an order with the same id appeared in the meantime.
pub async fn insert_paid_order(
    order: NewOrder,
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, PaymentGatewayError> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, amount, currency, receipt, status, payment_id)
            VALUES ($1, $2, $3, $4, 'paid', $5)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.amount)
    .bind(order.currency)
    .bind(order.receipt)
    .bind(payment_id.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(o) = &order {
        debug!("🗃️ Paid order [{}] inserted with id {} from payment {payment_id}", o.order_id, o.id);
    }
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// All orders, newest first
pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY id DESC").fetch_all(conn).await?;
    Ok(orders)
}

/// Moves a `created` order to `paid`.
///
/// The status check and the write are a single statement, so two racing callers cannot both "win". The loser, and
/// any caller for an order that is already paid or refunded, gets the current row back with `changed == false`.
pub async fn transition_to_paid(
    order_id: &OrderId,
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<OrderTransition, PaymentGatewayError> {
    let updated: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET status = 'paid', payment_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $2 AND status = 'created'
            RETURNING *;
        "#,
    )
    .bind(payment_id.as_str())
    .bind(order_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(order) => {
            debug!("🗃️ Order [{order_id}] marked as paid by payment {payment_id}");
            Ok(OrderTransition::changed(order))
        },
        None => {
            let order = fetch_order_by_order_id(order_id, conn)
                .await?
                .ok_or_else(|| PaymentGatewayError::OrderNotFound(order_id.clone()))?;
            trace!("🗃️ Order [{order_id}] is already {}. Not marking as paid.", order.status);
            Ok(OrderTransition::unchanged(order))
        },
    }
}

/// Moves a `paid` order to `refunded`. Orders in any other state produce
/// [`PaymentGatewayError::InvalidTransition`].
pub async fn transition_to_refunded(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentGatewayError> {
    let updated: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET status = 'refunded', updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1 AND status = 'paid'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(order) => {
            debug!("🗃️ Order [{order_id}] marked as refunded");
            Ok(order)
        },
        None => match fetch_order_by_order_id(order_id, conn).await? {
            Some(order) => Err(PaymentGatewayError::InvalidTransition {
                order_id: order_id.clone(),
                from: order.status,
                to: OrderStatusType::Refunded,
            }),
            None => Err(PaymentGatewayError::OrderNotFound(order_id.clone())),
        },
    }
}
