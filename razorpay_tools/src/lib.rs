//! # Razorpay tools
//!
//! A thin client for the parts of the Razorpay REST API that the payment gateway uses:
//! * `POST /orders` creates a remote order that the checkout widget is opened against.
//! * `POST /payments/{id}/refund` refunds (part of) a captured payment.
//!
//! There is no retry logic here. A failed call is reported to the caller, who decides what to do with it.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::RazorpayApi;
pub use config::{RazorpayConfig, DEFAULT_RAZORPAY_API_URL};
pub use data_objects::{NewRazorpayOrder, NewRazorpayRefund, RazorpayOrder, RazorpayRefund};
pub use error::RazorpayApiError;
