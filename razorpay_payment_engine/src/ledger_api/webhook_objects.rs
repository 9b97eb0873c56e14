//! Wire types for the reconciler: the client-side checkout callback, and the Razorpay webhook envelope.
use rpg_common::MinorUnits;
use serde::{Deserialize, Serialize};

use crate::db_types::{NewPayment, Order, OrderId, Payment, PaymentId, PaymentStatus};

/// What the checkout widget hands the client once a payment completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPaymentConfirmation {
    pub razorpay_order_id: OrderId,
    pub razorpay_payment_id: PaymentId,
    pub razorpay_signature: String,
}

/// The webhook envelope. Only the handful of events that affect the ledger are modelled; anything else lands in
/// `Unhandled`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum WebhookEvent {
    #[serde(rename = "payment.captured")]
    PaymentCaptured { payload: PaymentPayload },
    #[serde(rename = "payment.authorized")]
    PaymentAuthorized { payload: PaymentPayload },
    #[serde(rename = "payment.failed")]
    PaymentFailed { payload: PaymentPayload },
    #[serde(other)]
    Unhandled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentPayload {
    pub payment: EntityWrapper<PaymentEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: PaymentId,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: String,
    pub order_id: Option<OrderId>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
}

impl PaymentEntity {
    pub fn into_new_payment(self, status: PaymentStatus) -> NewPayment {
        NewPayment {
            payment_id: self.id,
            order_id: self.order_id.filter(|id| !id.as_str().is_empty()),
            amount: self.amount,
            currency: self.currency,
            status,
            email: non_empty(self.email),
            contact: non_empty(self.contact),
            description: non_empty(self.description),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// The ledger state after a payment was reconciled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledPayment {
    pub order: Order,
    pub payment: Payment,
    /// False if the order was already paid (or refunded) before this event
    pub order_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    Processed { event: String, payment: Payment, order: Option<Order> },
    Ignored { event: String, reason: String },
}

impl WebhookOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Processed { event, payment, order: Some(order) } => {
                format!(
                    "{event} processed. Payment {} is {}; order {} is {}",
                    payment.payment_id, payment.status, order.order_id, order.status
                )
            },
            Self::Processed { event, payment, order: None } => {
                format!("{event} processed. Payment {} is {}", payment.payment_id, payment.status)
            },
            Self::Ignored { event, reason } => format!("{event} ignored. {reason}"),
        }
    }
}
