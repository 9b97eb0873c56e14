use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
pub use rpg_common::MinorUnits;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(String);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The lifecycle of an order. Statuses only ever move forward: `Created` -> `Paid` -> `Refunded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order exists at the gateway, but no successful payment has been seen yet.
    Created,
    /// A captured payment has been reconciled against the order.
    Paid,
    /// The captured amount has been refunded in full. Terminal.
    Refunded,
}

impl OrderStatusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to created");
            OrderStatusType::Created
        })
    }
}

//--------------------------------------    PaymentStatus      ---------------------------------------------------------
/// Payment statuses as reported by Razorpay.
///
/// A stored payment only moves to a status with a strictly higher [`rank`](PaymentStatus::rank). Webhooks can
/// arrive in any order, so a late `payment.authorized` must never undo a `captured` payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Failed,
    Authorized,
    Captured,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [Self::Created, Self::Failed, Self::Authorized, Self::Captured, Self::Refunded];

    pub fn rank(&self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Failed => 1,
            Self::Authorized => 2,
            Self::Captured => 3,
            Self::Refunded => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Failed => "failed",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Refunded => "refunded",
        }
    }

    /// The status that results from merging `other` into `self`.
    pub fn advance(self, other: PaymentStatus) -> PaymentStatus {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.as_str() == s).ok_or_else(|| ConversionError(s.to_string()))
    }
}

//--------------------------------------      Identifiers      ---------------------------------------------------------
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// The order id assigned by the gateway, e.g. `order_IluGWxBm9U8zJ8`
    OrderId
);
string_id!(
    /// The payment id assigned by the gateway, e.g. `pay_29QQoUBi66xm2f`
    PaymentId
);
string_id!(RefundId);

//--------------------------------------        Order       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatusType,
    pub payment_id: Option<PaymentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
}

impl NewOrder {
    pub fn new<S: Into<String>>(order_id: OrderId, amount: MinorUnits, currency: S, receipt: S) -> Self {
        Self { order_id, amount, currency: currency.into(), receipt: receipt.into() }
    }
}

//--------------------------------------       Payment       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub payment_id: PaymentId,
    pub order_id: Option<OrderId>,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: PaymentStatus,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payment as observed from the gateway, either from a webhook or from a verified client callback.
/// It is merged into any existing record for the same `payment_id` rather than replacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub payment_id: PaymentId,
    pub order_id: Option<OrderId>,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: PaymentStatus,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
}

impl NewPayment {
    pub fn new<S: Into<String>>(payment_id: PaymentId, amount: MinorUnits, currency: S, status: PaymentStatus) -> Self {
        Self {
            payment_id,
            order_id: None,
            amount,
            currency: currency.into(),
            status,
            email: None,
            contact: None,
            description: None,
        }
    }

    pub fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

//--------------------------------------        Refund       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Refund {
    pub id: i64,
    pub refund_id: RefundId,
    pub payment_id: PaymentId,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefund {
    pub refund_id: RefundId,
    pub payment_id: PaymentId,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: String,
}

//--------------------------------------    Customer data    ---------------------------------------------------------
/// The contact details attached to a captured payment
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerPayment {
    pub order_id: Option<OrderId>,
    pub amount: MinorUnits,
    pub email: Option<String>,
    pub contact: Option<String>,
}
