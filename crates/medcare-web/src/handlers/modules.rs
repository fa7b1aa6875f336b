//! Placeholder pages for modules that have no behaviour yet.

use axum::{
  extract::{Path, State},
  response::Html,
};
use medcare_core::store::PatientStore;

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  pages::{self, Module},
};

pub async fn handler<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
) -> Result<Html<String>, Error>
where
  S: PatientStore + Clone + 'static,
{
  let module = Module::placeholder(&slug).ok_or(Error::NotFound)?;
  Ok(Html(pages::placeholder(&state.config, module)))
}
