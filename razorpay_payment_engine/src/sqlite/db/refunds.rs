use log::debug;
use rpg_common::MinorUnits;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewRefund, PaymentId, Refund},
    sqlite::db::is_unique_violation,
    traits::PaymentGatewayError,
};

pub async fn insert_refund(refund: NewRefund, conn: &mut SqliteConnection) -> Result<Refund, PaymentGatewayError> {
    let refund_id = refund.refund_id.clone();
    let result: Result<Refund, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO refund (refund_id, payment_id, amount, currency, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(refund.refund_id)
    .bind(refund.payment_id)
    .bind(refund.amount)
    .bind(refund.currency)
    .bind(refund.status)
    .fetch_one(conn)
    .await;
    match result {
        Ok(refund) => {
            debug!("🗃️ Refund {} of {} recorded for payment {}", refund.refund_id, refund.amount, refund.payment_id);
            Ok(refund)
        },
        Err(e) if is_unique_violation(&e) => Err(PaymentGatewayError::RefundAlreadyExists(refund_id.to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_refunds_for_payment(
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Refund>, sqlx::Error> {
    let refunds = sqlx::query_as("SELECT * FROM refund WHERE payment_id = $1 ORDER BY id")
        .bind(payment_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(refunds)
}

pub async fn total_refunded(payment_id: &PaymentId, conn: &mut SqliteConnection) -> Result<MinorUnits, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM refund WHERE payment_id = $1")
        .bind(payment_id.as_str())
        .fetch_one(conn)
        .await?;
    Ok(MinorUnits::from(total))
}
