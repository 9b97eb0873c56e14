use razorpay_payment_engine::db_types::{MinorUnits, PaymentId};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ServerError;

/// Payload for `POST /api/create-order`. The amount is in major units and may be a number or a string.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderParams {
    pub amount: Value,
}

/// Payload for `POST /api/refund`
#[derive(Debug, Clone, Deserialize)]
pub struct RefundParams {
    #[serde(rename = "paymentId")]
    pub payment_id: PaymentId,
    pub amount: Value,
}

/// Converts a major-unit amount from a request body into minor units.
///
/// JSON numbers are read through their decimal representation, so `499.5` becomes 49950 without any
/// floating-point rounding.
pub fn parse_major_amount(amount: &Value) -> Result<MinorUnits, ServerError> {
    let text = match amount {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Null => return Err(ServerError::InvalidAmount("An amount is required".into())),
        v => return Err(ServerError::InvalidAmount(format!("{v} is not a number"))),
    };
    let amount = text.parse::<MinorUnits>().map_err(|e| ServerError::InvalidAmount(e.to_string()))?;
    if !amount.is_positive() {
        return Err(ServerError::InvalidAmount("The amount must be greater than zero".into()));
    }
    Ok(amount)
}
