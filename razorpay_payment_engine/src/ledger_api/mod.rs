//! # Razorpay payment engine public API
//!
//! The `ledger_api` module exposes the programmatic API for the payment engine.
//!
//! * [`order_ledger_api`] records orders and moves them through their lifecycle.
//! * [`reconciler_api`] turns verified gateway events (client callbacks and webhooks) into ledger changes.
//! * [`refund_api`] issues refunds through the gateway and books them against the payment.
//! * [`checkout_api`] creates orders at the gateway and records them locally.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend, and a gateway client where the API makes outbound calls.
//!
//! ```rust,ignore
//! use razorpay_payment_engine::{OrderLedgerApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = OrderLedgerApi::new(db);
//! let orders = api.fetch_all_orders().await?;
//! ```
pub mod checkout_api;
pub mod errors;
pub mod order_ledger_api;
pub mod reconciler_api;
pub mod refund_api;
pub mod webhook_objects;
