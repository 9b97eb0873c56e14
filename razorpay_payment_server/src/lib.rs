//! # Razorpay payment server
//! This crate hosts the HTTP front end of the payment gateway. It is responsible for:
//! * Opening orders at Razorpay on behalf of the checkout page.
//! * Verifying the signed payment confirmation that the checkout widget hands back to the client.
//! * Receiving Razorpay webhooks and reconciling them with the local ledger.
//! * Issuing refunds against captured payments.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api`: A status route that returns `{"status": "Ok"}`.
//! * `/api/create-order`, `/api/verify-payment`, `/api/webhook`, `/api/refund`: The payment flow.
//! * `/api/getAllOrders`, `/api/getAllUserData`: Reporting.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
