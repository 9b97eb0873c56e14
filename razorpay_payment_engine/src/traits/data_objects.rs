use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Payment, Refund};

/// The result of asking for an order status change. `changed` is false when the order was already in (or past) the
/// requested state and nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransition {
    pub order: Order,
    pub changed: bool,
}

impl OrderTransition {
    pub fn changed(order: Order) -> Self {
        Self { order, changed: true }
    }

    pub fn unchanged(order: Order) -> Self {
        Self { order, changed: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRefund {
    pub refund: Refund,
    /// The payment after the refund was booked. Its status is `refunded` once the captured amount has been returned
    /// in full.
    pub payment: Payment,
    /// Set when this refund closed out the order
    pub closed_order: Option<Order>,
}
