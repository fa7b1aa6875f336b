//! Login and logout handlers.
//!
//! A successful login always mints a fresh session token.

use axum::{
  Form,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Redirect, Response},
};
use medcare_core::{session::SessionId, store::PatientStore};
use serde::Deserialize;

use crate::{
  AppState,
  auth::{expired_session_cookie, session_cookie, session_from_headers},
  pages::{self, Notice, NoticeKind},
};

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// `GET /login`
pub async fn form<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
  S: PatientStore + Clone + 'static,
{
  if session_from_headers(&headers).is_some_and(|s| state.gate.is_logged_in(&s)) {
    return Redirect::to("/dashboard").into_response();
  }
  let hint = state.gate.hint();
  Html(pages::login(&state.config, &[], hint.as_deref())).into_response()
}

/// `POST /login`
///
/// On success any session the request already carried is logged out, so
/// repeated logins from one browser hold a single entry in the gate.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Form(form): Form<LoginForm>,
) -> Response
where
  S: PatientStore + Clone + 'static,
{
  let session = SessionId::generate();

  if state.gate.authenticate(&session, &form.username, &form.password) {
    if let Some(previous) = session_from_headers(&headers) {
      state.gate.logout(&previous);
    }
    tracing::info!(username = form.username.trim(), "login succeeded");
    return (
      [(header::SET_COOKIE, session_cookie(&session))],
      Redirect::to("/dashboard"),
    )
      .into_response();
  }

  tracing::warn!(username = form.username.trim(), "login failed");
  let notices = [Notice::new(NoticeKind::Error, "Invalid username or password")];
  let hint = state.gate.hint();
  (
    StatusCode::UNAUTHORIZED,
    Html(pages::login(&state.config, &notices, hint.as_deref())),
  )
    .into_response()
}

/// `POST /logout`
pub async fn logout<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
  S: PatientStore + Clone + 'static,
{
  if let Some(session) = session_from_headers(&headers) {
    state.gate.logout(&session);
    tracing::info!("logged out");
  }
  (
    [(header::SET_COOKIE, expired_session_cookie())],
    Redirect::to("/login"),
  )
    .into_response()
}
