use std::fmt::Debug;

use log::*;
use rpg_common::MinorUnits;

use crate::{
    db_types::{NewRefund, PaymentId, PaymentStatus, Refund},
    ledger_api::errors::RefundError,
    traits::{PaymentGateway, PaymentGatewayDatabase, RecordedRefund},
};

/// `RefundProcessorApi` refunds captured payments through the gateway and books the result.
///
/// All validation happens before the gateway is called. A refund is only written to the ledger once the gateway
/// has accepted it.
pub struct RefundProcessorApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for RefundProcessorApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefundProcessorApi")
    }
}

impl<B, G> RefundProcessorApi<B, G>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
{
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }

    /// Refunds `amount` of the given payment.
    ///
    /// The payment must be `captured`, and the amount must not exceed what remains after earlier refunds. When the
    /// payment has been refunded in full, it is marked as `refunded` and its order is closed. Any later request
    /// against it fails with `InvalidAmount`, since nothing remains to refund.
    pub async fn refund(&self, payment_id: &PaymentId, amount: MinorUnits) -> Result<RecordedRefund, RefundError> {
        let payment =
            self.db.fetch_payment(payment_id).await?.ok_or_else(|| RefundError::PaymentNotFound(payment_id.clone()))?;
        if payment.status == PaymentStatus::Refunded {
            debug!("💸️ Payment {payment_id} has already been refunded in full");
            return Err(RefundError::InvalidAmount(format!(
                "{amount} was requested, but payment {payment_id} has nothing left to refund"
            )));
        }
        if payment.status != PaymentStatus::Captured {
            debug!("💸️ Payment {payment_id} is {}. Refusing to refund it", payment.status);
            return Err(RefundError::PaymentNotRefundable { payment_id: payment_id.clone(), status: payment.status });
        }
        if !amount.is_positive() {
            return Err(RefundError::InvalidAmount(format!("Refunds must be positive, but {amount} was requested")));
        }
        let already_refunded = self.db.total_refunded(payment_id).await?;
        let remaining = payment.amount - already_refunded;
        if amount > remaining {
            return Err(RefundError::InvalidAmount(format!(
                "{amount} was requested, but only {remaining} of payment {payment_id} can still be refunded"
            )));
        }
        debug!("💸️ Requesting refund of {amount} for payment {payment_id}. {already_refunded} refunded previously");
        let issued = self.gateway.create_refund(payment_id, amount).await.map_err(|e| {
            warn!("💸️ Refund of {amount} for payment {payment_id} failed at the gateway. {e}");
            RefundError::from(e)
        })?;
        let refund = NewRefund {
            refund_id: issued.id,
            payment_id: payment_id.clone(),
            amount: issued.amount,
            currency: issued.currency,
            status: issued.status,
        };
        let recorded = self.db.record_refund(refund).await.map_err(|e| {
            error!(
                "💸️ The gateway accepted a refund of {amount} for payment {payment_id}, but it could not be recorded. \
                 The ledger needs to be corrected by hand. {e}"
            );
            RefundError::from(e)
        })?;
        info!("💸️ Refund {} of {} issued for payment {payment_id}", recorded.refund.refund_id, recorded.refund.amount);
        if let Some(order) = &recorded.closed_order {
            info!("💸️ Payment {payment_id} is fully refunded. Order [{}] is closed", order.order_id);
        }
        Ok(recorded)
    }

    pub async fn refunds_for_payment(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, RefundError> {
        let refunds = self.db.fetch_refunds_for_payment(payment_id).await?;
        Ok(refunds)
    }
}
