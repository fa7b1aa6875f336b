//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use medcare_core::store::PatientStore;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Stats {
  pub total_patients: u64,
}

/// `GET /stats`
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Stats>, ApiError>
where
  S: PatientStore,
{
  let total_patients = store.count_patients().await.map_err(ApiError::store)?;
  Ok(Json(Stats { total_patients }))
}
