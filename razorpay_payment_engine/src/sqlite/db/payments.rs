use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{CustomerPayment, NewPayment, Payment, PaymentId, PaymentStatus},
    traits::PaymentGatewayError,
};

/// A SQL expression giving the forward-progress rank of the status held in `column`.
fn status_rank_sql(column: &str) -> String {
    let arms = PaymentStatus::ALL
        .iter()
        .map(|s| format!("WHEN '{}' THEN {}", s.as_str(), s.rank()))
        .collect::<Vec<String>>()
        .join(" ");
    format!("(CASE {column} {arms} ELSE -1 END)")
}

/// Inserts the payment, or merges it into the existing record with the same `payment_id`.
///
/// On a merge,
/// * the status is replaced only if the new status ranks strictly higher than the stored one,
/// * `order_id`, `email`, `contact` and `description` are filled in if they were null, and are otherwise kept,
/// * `amount` and `currency` keep their original values.
pub async fn upsert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, PaymentGatewayError> {
    let new_rank = status_rank_sql("excluded.status");
    let old_rank = status_rank_sql("rzp_payments.status");
    let sql = format!(
        r#"
            INSERT INTO rzp_payments (payment_id, order_id, amount, currency, status, email, contact, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (payment_id) DO UPDATE SET
                order_id = COALESCE(rzp_payments.order_id, excluded.order_id),
                email = COALESCE(rzp_payments.email, excluded.email),
                contact = COALESCE(rzp_payments.contact, excluded.contact),
                description = COALESCE(rzp_payments.description, excluded.description),
                status = CASE WHEN {new_rank} > {old_rank} THEN excluded.status ELSE rzp_payments.status END,
                updated_at = CASE WHEN {new_rank} > {old_rank} THEN CURRENT_TIMESTAMP ELSE rzp_payments.updated_at END
            RETURNING *;
        "#
    );
    let payment_id = payment.payment_id.clone();
    let requested = payment.status;
    let stored: Payment = sqlx::query_as(&sql)
        .bind(payment.payment_id)
        .bind(payment.order_id)
        .bind(payment.amount)
        .bind(payment.currency)
        .bind(payment.status)
        .bind(payment.email)
        .bind(payment.contact)
        .bind(payment.description)
        .fetch_one(conn)
        .await?;
    if stored.status == requested {
        debug!("🗃️ Payment {payment_id} saved with status {}", stored.status);
    } else {
        debug!("🗃️ Payment {payment_id} is already {}. Ignoring status {requested}", stored.status);
    }
    Ok(stored)
}

pub async fn fetch_payment(
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM rzp_payments WHERE payment_id = $1")
        .bind(payment_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

pub async fn fetch_captured_payments(conn: &mut SqliteConnection) -> Result<Vec<CustomerPayment>, sqlx::Error> {
    let payments = sqlx::query_as(
        "SELECT order_id, amount, email, contact FROM rzp_payments WHERE status = 'captured' ORDER BY id DESC",
    )
    .fetch_all(conn)
    .await?;
    Ok(payments)
}
