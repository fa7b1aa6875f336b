//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use medcare_core::{RegisterError, RegistrationError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Registration(#[from] RegistrationError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl<E> From<RegisterError<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(e: RegisterError<E>) -> Self {
    match e {
      RegisterError::Rejected(r) => ApiError::Registration(r),
      RegisterError::Storage(s) => ApiError::store(s),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Registration(RegistrationError::MissingRequiredField(fields)) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": self.to_string(), "fields": fields })),
      )
        .into_response(),
      ApiError::Registration(RegistrationError::DuplicatePhone(_)) => (
        StatusCode::CONFLICT,
        Json(json!({ "error": self.to_string() })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
