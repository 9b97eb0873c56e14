//! Adapts the Razorpay REST client to the engine's [`PaymentGateway`] trait.
use log::*;
use razorpay_payment_engine::{
    db_types::{MinorUnits, OrderId, PaymentId, RefundId},
    GatewayError,
    GatewayOrder,
    GatewayRefund,
    PaymentGateway,
};
use razorpay_tools::{NewRazorpayOrder, NewRazorpayRefund, RazorpayApi, RazorpayApiError, RazorpayConfig};

#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount: MinorUnits,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let order = self.api.create_order(&NewRazorpayOrder::new(amount, currency, receipt)).await.map_err(|e| {
            log_failure(&e, &format!("create an order for {amount} {currency}"));
            gateway_error(e)
        })?;
        Ok(GatewayOrder {
            id: OrderId::new(order.id),
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt.unwrap_or_else(|| receipt.to_string()),
            status: order.status,
            created_at: order.created_at,
        })
    }

    async fn create_refund(&self, payment_id: &PaymentId, amount: MinorUnits) -> Result<GatewayRefund, GatewayError> {
        let refund =
            self.api.create_refund(payment_id.as_str(), &NewRazorpayRefund::new(amount)).await.map_err(|e| {
                log_failure(&e, &format!("refund {amount} of payment {payment_id}"));
                gateway_error(e)
            })?;
        Ok(GatewayRefund {
            id: RefundId::new(refund.id),
            payment_id: PaymentId::new(refund.payment_id),
            amount: refund.amount,
            currency: refund.currency,
            status: refund.status,
        })
    }
}

fn log_failure(e: &RazorpayApiError, action: &str) {
    if e.is_rejection() {
        warn!("💳️ Razorpay refused to {action}. {e}");
    } else {
        error!("💳️ Could not {action} at Razorpay. {e}");
    }
}

fn gateway_error(e: RazorpayApiError) -> GatewayError {
    match e {
        RazorpayApiError::QueryError { status, message } if (400..500).contains(&status) => {
            GatewayError::Rejected { status, message }
        },
        RazorpayApiError::QueryError { status, message } => GatewayError::Transport(format!("{status}: {message}")),
        RazorpayApiError::RestResponseError(s) => GatewayError::Transport(s),
        RazorpayApiError::Initialization(s) => GatewayError::Transport(s),
        RazorpayApiError::JsonError(s) => GatewayError::InvalidResponse(s),
    }
}
