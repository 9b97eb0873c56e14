//! # Backend and gateway contracts
//!
//! The payment engine talks to two things it doesn't own:
//!
//! * [`PaymentGatewayDatabase`] is the ledger backend. Every method is a single atomic unit of work. Methods that
//!   touch more than one table do so inside one transaction, so a crash never leaves an order marked paid
//!   without its payment record (or vice versa).
//! * [`PaymentGateway`] is the remote payment provider. The engine only needs to create orders and refunds there.
mod data_objects;
mod payment_gateway;
mod payment_gateway_database;

pub use data_objects::{OrderTransition, RecordedRefund};
pub use payment_gateway::{GatewayError, GatewayOrder, GatewayRefund, PaymentGateway};
pub use payment_gateway_database::{PaymentGatewayDatabase, PaymentGatewayError};
