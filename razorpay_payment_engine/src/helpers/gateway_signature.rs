//! # Gateway signatures
//!
//! Razorpay authenticates the messages it sends us with an HMAC-SHA256, hex encoded.
//!
//! * When the checkout widget completes, the client receives `razorpay_signature`, computed over
//!   `{order_id}|{payment_id}` and keyed with the merchant's API key secret.
//! * Every webhook delivery carries an `X-Razorpay-Signature` header, computed over the raw request body and keyed
//!   with the webhook secret configured in the Razorpay dashboard.
//!
//! Verification must happen over the exact bytes received. Re-serializing a parsed webhook body will not produce the
//! same digest.
use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The message that Razorpay signs when a checkout payment completes.
pub fn payment_signature_material(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Returns true if `signature` is the hex-encoded HMAC-SHA256 of `material` under `secret`.
    ///
    /// The comparison is constant-time. Malformed signatures and empty secrets never verify.
    pub fn verify(material: &[u8], signature: &str, secret: &str) -> bool {
        if secret.is_empty() {
            warn!("🔐️ Signature check requested with an empty secret. Rejecting.");
            return false;
        }
        let Ok(expected) = hex::decode(signature.trim()) else {
            debug!("🔐️ Signature is not valid hex");
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(material);
        let valid = mac.verify_slice(&expected).is_ok();
        trace!("🔐️ Signature check result: {valid}");
        valid
    }

    /// Produces the hex-encoded HMAC-SHA256 of `material` under `secret`.
    pub fn sign(material: &[u8], secret: &str) -> String {
        match HmacSha256::new_from_slice(secret.as_bytes()) {
            Ok(mut mac) => {
                mac.update(material);
                hex::encode(mac.finalize().into_bytes())
            },
            Err(e) => {
                error!("🔐️ Could not initialise HMAC: {e}");
                String::default()
            },
        }
    }
}
