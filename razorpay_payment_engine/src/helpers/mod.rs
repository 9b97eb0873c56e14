mod gateway_signature;

pub use gateway_signature::{payment_signature_material, SignatureVerifier};
