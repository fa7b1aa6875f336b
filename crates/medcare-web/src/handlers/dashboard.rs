//! GET handler for the dashboard.

use axum::{extract::State, response::Html};
use medcare_core::store::PatientStore;

use crate::{AppState, auth::Authenticated, error::Error, pages};

pub async fn handler<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: PatientStore + Clone + 'static,
{
  let total = state
    .store
    .count_patients()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Html(pages::dashboard(&state.config, total)))
}
