//! Session cookie handling, the login-required extractor, and argon2-backed
//! credential verification.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  middleware::Next,
  response::{IntoResponse, Response},
};
use medcare_core::{
  session::{CredentialVerifier, SessionId},
  store::PatientStore,
};
use serde_json::json;

use crate::{AppState, error::Error};

// ─── Credentials ──────────────────────────────────────────────────────────────

/// A configured username plus an argon2 PHC string.
#[derive(Clone)]
pub struct Argon2Credentials {
  username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  password_hash: String,
}

impl Argon2Credentials {
  /// Fails if `password_hash` is not a parseable PHC string, so a bad config
  /// is caught at startup rather than at the first login.
  pub fn new(
    username: impl Into<String>,
    password_hash: impl Into<String>,
  ) -> Result<Self, argon2::password_hash::Error> {
    let password_hash = password_hash.into();
    PasswordHash::new(&password_hash)?;
    Ok(Self { username: username.into(), password_hash })
  }
}

impl CredentialVerifier for Argon2Credentials {
  fn verify(&self, username: &str, password: &str) -> bool {
    if username.trim() != self.username {
      return false;
    }
    let Ok(parsed_hash) = PasswordHash::new(&self.password_hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .is_ok()
  }
}

// ─── Cookies ──────────────────────────────────────────────────────────────────

pub const SESSION_COOKIE: &str = "medcare_session";

/// `Set-Cookie` value carrying `session`.
pub fn session_cookie(session: &SessionId) -> String {
  format!(
    "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
    session.as_str()
  )
}

/// `Set-Cookie` value that removes the session cookie from the browser.
pub fn expired_session_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Find a well-formed session token among the request's `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .filter(|(name, _)| *name == SESSION_COOKIE)
    .find_map(|(_, value)| SessionId::parse(value))
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// Present in a handler means the request carries a logged-in session.
pub struct Authenticated(pub SessionId);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: PatientStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    session_from_headers(&parts.headers)
      .filter(|s| state.gate.is_logged_in(s))
      .map(Authenticated)
      .ok_or(Error::LoginRequired)
  }
}

/// Middleware for the JSON API: 401 instead of a redirect to the login page.
pub async fn require_api_session<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Response
where
  S: PatientStore + Clone + 'static,
{
  let logged_in = session_from_headers(req.headers())
    .is_some_and(|s| state.gate.is_logged_in(&s));
  if !logged_in {
    return (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "error": "login required" })),
    )
      .into_response();
  }
  next.run(req).await
}
