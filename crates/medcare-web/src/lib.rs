//! Browser front end for the MedCare patient registry.
//!
//! Exposes an axum [`Router`] serving server-rendered HTML pages (login,
//! dashboard, patients, placeholder modules) plus the JSON API from
//! `medcare-api`, all behind a cookie-based [`SessionGate`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::State,
  http::HeaderMap,
  middleware,
  response::{IntoResponse, Redirect, Response},
  routing::{get, post},
};
use medcare_core::{
  session::{SessionGate, StaticCredentials},
  store::PatientStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{Argon2Credentials, require_api_session, session_from_headers};
use handlers::{dashboard, login, modules, patients};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MEDCARE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Shown in page titles, headings and the footer.
  #[serde(default = "default_system_name")]
  pub system_name:        String,
  #[serde(default = "default_auth_username")]
  pub auth_username:      String,
  /// Argon2 PHC string. Without it the demo credentials are used.
  #[serde(default)]
  pub auth_password_hash: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8501 }

fn default_store_path() -> PathBuf { PathBuf::from("hospital.db") }

fn default_system_name() -> String { "MedCare Hospital Management System".to_owned() }

fn default_auth_username() -> String { StaticCredentials::DEMO_USERNAME.to_owned() }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         default_store_path(),
      system_name:        default_system_name(),
      auth_username:      default_auth_username(),
      auth_password_hash: None,
    }
  }
}

impl ServerConfig {
  /// Build the session gate for the configured credentials.
  pub fn session_gate(&self) -> Result<SessionGate, argon2::password_hash::Error> {
    match &self.auth_password_hash {
      Some(hash) => Ok(SessionGate::new(Argon2Credentials::new(
        self.auth_username.clone(),
        hash.clone(),
      )?)),
      None => Ok(SessionGate::new(StaticCredentials::demo())),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PatientStore> {
  pub store:  Arc<S>,
  pub gate:   Arc<SessionGate>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`]: HTML pages plus `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PatientStore + Clone + 'static,
{
  let api = medcare_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), require_api_session::<S>),
  );

  Router::new()
    .route("/",                get(root_handler::<S>))
    .route("/login",           get(login::form::<S>).post(login::submit::<S>))
    .route("/logout",          post(login::logout::<S>))
    .route("/dashboard",       get(dashboard::handler::<S>))
    .route("/patients",        get(patients::list::<S>).post(patients::register::<S>))
    .route("/modules/{slug}",  get(modules::handler::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn root_handler<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
  S: PatientStore + Clone + 'static,
{
  let logged_in = session_from_headers(&headers).is_some_and(|s| state.gate.is_logged_in(&s));
  if logged_in {
    Redirect::to("/dashboard").into_response()
  } else {
    Redirect::to("/login").into_response()
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
