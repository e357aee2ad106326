//! Delivery of accepted applications.
//!
//! `Submitter` is the seam between the form lifecycle and whatever receives
//! applications. `SimulatedSubmitter` stands in for the real endpoint: it
//! waits, logs the application and the address it is meant for, and
//! acknowledges (or fails, when configured to).

pub mod client;
pub mod error;
pub mod simulated;

pub use client::{Ack, Submitter};
pub use error::SubmitError;
pub use simulated::{SimulatedSubmitter, DEFAULT_LATENCY_MS, DEFAULT_RECIPIENT};
