use rpg_common::MinorUnits;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRazorpayOrder {
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    #[serde(default)]
    pub notes: Value,
}

impl NewRazorpayOrder {
    pub fn new<S: Into<String>>(amount: MinorUnits, currency: S, receipt: S) -> Self {
        Self { amount, currency: currency.into(), receipt: receipt.into(), notes: Value::Object(Default::default()) }
    }
}

/// An order entity, as returned by Razorpay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: MinorUnits,
    #[serde(default)]
    pub amount_paid: MinorUnits,
    #[serde(default)]
    pub amount_due: MinorUnits,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    // Razorpay sends `[]` for empty notes, and an object otherwise
    #[serde(default)]
    pub notes: Value,
    pub created_at: i64,
}

/// Request body for `POST /payments/{id}/refund`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRazorpayRefund {
    pub amount: MinorUnits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Value,
}

impl NewRazorpayRefund {
    pub fn new(amount: MinorUnits) -> Self {
        Self { amount, receipt: None, notes: Value::Object(Default::default()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RazorpayRefund {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub payment_id: String,
    #[serde(default)]
    pub notes: Value,
    pub receipt: Option<String>,
    pub status: String,
    pub speed_requested: Option<String>,
    pub speed_processed: Option<String>,
    pub created_at: i64,
}

/// The error envelope Razorpay uses for every non-2xx response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
