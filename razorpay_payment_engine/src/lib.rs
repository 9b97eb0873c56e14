//! Razorpay Payment Engine
//!
//! The payment engine reconciles what the Razorpay gateway tells us about payments with a local ledger of orders,
//! payments and refunds.
//!
//! The library is divided into three main sections:
//! 1. Database management ([`mod@sqlite`] and [`mod@traits`]). SQLite is the supported backend. You should never need
//!    to access the database directly. Instead, use the public API provided by the payment engine. The exception is
//!    the data types used in the database. These are defined in the `db_types` module and are public.
//! 2. The payment engine public API ([`mod@ledger_api`]). This covers the order lifecycle, reconciliation of gateway
//!    events, refunds and checkout.
//! 3. Gateway signature verification ([`mod@helpers`]).
pub mod db_types;
pub mod helpers;
pub mod ledger_api;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use helpers::SignatureVerifier;
pub use ledger_api::{
    checkout_api::CheckoutApi,
    errors::{CheckoutError, ReconcileError, RefundError},
    order_ledger_api::OrderLedgerApi,
    reconciler_api::PaymentReconcilerApi,
    refund_api::RefundProcessorApi,
    webhook_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    GatewayError,
    GatewayOrder,
    GatewayRefund,
    OrderTransition,
    PaymentGateway,
    PaymentGatewayDatabase,
    PaymentGatewayError,
    RecordedRefund,
};
