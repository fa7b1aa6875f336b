//! Handlers for `/patients` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/patients` | Optional `?q=` case-sensitive substring filter |
//! | `POST` | `/patients` | Body: [`Registration`]; returns 201 + stored record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use medcare_core::{
  Registration,
  patient::PatientRecord,
  registration::register_patient,
  store::PatientStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Matched against first name, last name and phone.
  pub q: Option<String>,
}

/// `GET /patients[?q=<text>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PatientRecord>>, ApiError>
where
  S: PatientStore,
{
  let patients = store
    .list_patients(params.q.as_deref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(patients))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /patients`: returns 201 + the stored [`PatientRecord`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PatientStore,
{
  let record = register_patient(store.as_ref(), body).await?;
  tracing::info!(id = record.id, "patient registered via api");
  Ok((StatusCode::CREATED, Json(record)))
}
