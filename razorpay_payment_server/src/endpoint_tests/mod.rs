mod checkout_flow;
mod cors;
mod mocks;
mod payments;
mod refunds;
mod webhook;
