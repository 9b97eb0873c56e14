use std::fmt::Debug;

use log::*;
use rpg_common::Secret;

use crate::{
    db_types::PaymentStatus,
    helpers::{payment_signature_material, SignatureVerifier},
    ledger_api::{
        errors::ReconcileError,
        webhook_objects::{ClientPaymentConfirmation, ReconciledPayment, WebhookEvent, WebhookOutcome},
    },
    traits::PaymentGatewayDatabase,
};

/// `PaymentReconcilerApi` maps verified gateway events onto the ledger.
///
/// Payments are reported twice: once by the client, straight after checkout, and once by a server-to-server
/// webhook. Either can arrive first, and webhooks can be redelivered. Both paths converge on the same final state.
pub struct PaymentReconcilerApi<B> {
    db: B,
    key_secret: Secret<String>,
    webhook_secret: Secret<String>,
}

impl<B> Debug for PaymentReconcilerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentReconcilerApi")
    }
}

impl<B> PaymentReconcilerApi<B>
where B: PaymentGatewayDatabase
{
    pub fn new(db: B, key_secret: Secret<String>, webhook_secret: Secret<String>) -> Self {
        Self { db, key_secret, webhook_secret }
    }

    /// Handles the checkout callback.
    ///
    /// The signature is checked first, and nothing is written if it is invalid. Otherwise the order is marked as
    /// paid and a `captured` payment for the order amount is recorded, in one transaction.
    pub async fn verify_client_payment(
        &self,
        confirmation: ClientPaymentConfirmation,
    ) -> Result<ReconciledPayment, ReconcileError> {
        let ClientPaymentConfirmation {
            razorpay_order_id: order_id,
            razorpay_payment_id: payment_id,
            razorpay_signature: signature,
        } = confirmation;
        let material = payment_signature_material(order_id.as_str(), payment_id.as_str());
        if !SignatureVerifier::verify(material.as_bytes(), &signature, self.key_secret.reveal()) {
            warn!("🔄️ Payment signature for order [{order_id}], payment {payment_id} is invalid");
            return Err(ReconcileError::InvalidSignature);
        }
        let (transition, payment) = self.db.confirm_order_payment(&order_id, &payment_id).await?;
        info!(
            "🔄️ Client confirmed payment {payment_id} for order [{order_id}]. Order is {} (changed: {})",
            transition.order.status, transition.changed
        );
        Ok(ReconciledPayment { order: transition.order, payment, order_changed: transition.changed })
    }

    /// Handles a webhook delivery. `body` must be the raw request body, exactly as received.
    ///
    /// Events that don't affect the ledger come back as [`WebhookOutcome::Ignored`] rather than as an error, so that
    /// the gateway does not keep redelivering them.
    pub async fn process_webhook(&self, body: &[u8], signature: &str) -> Result<WebhookOutcome, ReconcileError> {
        if !SignatureVerifier::verify(body, signature, self.webhook_secret.reveal()) {
            warn!("🔄️ Webhook signature is invalid. Rejecting the delivery.");
            return Err(ReconcileError::InvalidSignature);
        }
        let value = serde_json::from_slice::<serde_json::Value>(body)
            .map_err(|e| ReconcileError::MalformedPayload(e.to_string()))?;
        let event_name = value["event"].as_str().unwrap_or_default().to_string();
        let event = serde_json::from_value::<WebhookEvent>(value)
            .map_err(|e| ReconcileError::MalformedPayload(format!("{event_name}: {e}")))?;
        debug!("🔄️ Webhook event {event_name} received");
        let outcome = match event {
            WebhookEvent::PaymentCaptured { payload } => {
                let entity = payload.payment.entity;
                if entity.status != PaymentStatus::Captured.as_str() {
                    let reason = format!("Payment {} has status {}", entity.id, entity.status);
                    return Ok(self.ignore(event_name, reason));
                }
                let (transition, payment) =
                    self.db.process_captured_payment(entity.into_new_payment(PaymentStatus::Captured)).await?;
                WebhookOutcome::Processed { event: event_name, payment, order: transition.map(|t| t.order) }
            },
            WebhookEvent::PaymentAuthorized { payload } => {
                let payment = payload.payment.entity.into_new_payment(PaymentStatus::Authorized);
                let payment = self.db.upsert_payment(payment).await?;
                WebhookOutcome::Processed { event: event_name, payment, order: None }
            },
            WebhookEvent::PaymentFailed { payload } => {
                let payment = payload.payment.entity.into_new_payment(PaymentStatus::Failed);
                let payment = self.db.upsert_payment(payment).await?;
                WebhookOutcome::Processed { event: event_name, payment, order: None }
            },
            WebhookEvent::Unhandled => return Ok(self.ignore(event_name, "No handler for this event".to_string())),
        };
        info!("🔄️ {}", outcome.message());
        Ok(outcome)
    }

    fn ignore(&self, event: String, reason: String) -> WebhookOutcome {
        info!("🔄️ Webhook event {event} ignored. {reason}");
        WebhookOutcome::Ignored { event, reason }
    }
}
