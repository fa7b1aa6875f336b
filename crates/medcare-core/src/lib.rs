//! Core types and trait definitions for the MedCare patient registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod patient;
pub mod registration;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use registration::{RegisterError, Registration, RegistrationError, RequiredField};
