//! JSON REST API for the MedCare patient registry.
//!
//! Exposes an axum [`Router`] backed by any [`medcare_core::store::PatientStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", medcare_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod patients;
pub mod stats;

use std::sync::Arc;

use axum::{Router, routing::get};
use medcare_core::store::PatientStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PatientStore + 'static,
{
  Router::new()
    .route("/patients", get(patients::list::<S>).post(patients::create::<S>))
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}
