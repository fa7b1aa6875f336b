//! The session gate: per-session login state in front of the registry.
//!
//! Each session moves between two states. It starts [`SessionState::LoggedOut`],
//! becomes [`SessionState::LoggedIn`] on a successful
//! [`SessionGate::authenticate`], and returns to `LoggedOut` on
//! [`SessionGate::logout`]. Credential checks are delegated to a
//! [`CredentialVerifier`] so the state machine does not depend on how
//! credentials are stored.

use std::{
  collections::HashSet,
  fmt,
  sync::{Mutex, MutexGuard, PoisonError},
};

use rand_core::{OsRng, RngCore};

// ─── Credential verification ─────────────────────────────────────────────────

/// Decides whether a submitted username/password pair is acceptable.
pub trait CredentialVerifier: Send + Sync {
  fn verify(&self, username: &str, password: &str) -> bool;

  /// A hint the login screen may display, e.g. the demo credentials.
  fn hint(&self) -> Option<String> { None }
}

/// A single fixed username/password pair compared in plain text.
///
/// The username is compared after trimming surrounding whitespace; the
/// password is compared exactly.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
  username: String,
  password: String,
  demo:     bool,
}

impl StaticCredentials {
  pub const DEMO_USERNAME: &'static str = "admin";
  pub const DEMO_PASSWORD: &'static str = "admin123";

  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
      demo:     false,
    }
  }

  /// The built-in demo pair `admin` / `admin123`, advertised on the login page.
  pub fn demo() -> Self {
    Self {
      demo: true,
      ..Self::new(Self::DEMO_USERNAME, Self::DEMO_PASSWORD)
    }
  }
}

impl CredentialVerifier for StaticCredentials {
  fn verify(&self, username: &str, password: &str) -> bool {
    username.trim() == self.username && password == self.password
  }

  fn hint(&self) -> Option<String> {
    self
      .demo
      .then(|| format!("{} / {}", self.username, self.password))
  }
}

// ─── Session identity ────────────────────────────────────────────────────────

/// Opaque session token: 32 random bytes, hex-encoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
  const BYTES: usize = 32;

  /// Mint a fresh token from the operating system RNG.
  pub fn generate() -> Self {
    let mut bytes = [0u8; Self::BYTES];
    OsRng.fill_bytes(&mut bytes);
    Self(hex::encode(bytes))
  }

  /// Accept a token presented by a client, rejecting anything that could not
  /// have been produced by [`SessionId::generate`].
  pub fn parse(token: &str) -> Option<Self> {
    let well_formed = token.len() == Self::BYTES * 2
      && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    well_formed.then(|| Self(token.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SessionId({}…)", &self.0[..8])
  }
}

// ─── Gate ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
  LoggedOut,
  LoggedIn,
}

/// Tracks which sessions are logged in.
///
/// Sessions are held in memory only and do not expire: an entry is removed
/// only by [`SessionGate::logout`], so a token abandoned without logging out
/// stays in the set until the process exits.
pub struct SessionGate {
  verifier:  Box<dyn CredentialVerifier>,
  logged_in: Mutex<HashSet<SessionId>>,
}

impl SessionGate {
  pub fn new(verifier: impl CredentialVerifier + 'static) -> Self {
    Self {
      verifier:  Box::new(verifier),
      logged_in: Mutex::new(HashSet::new()),
    }
  }

  /// Check the credentials and, if accepted, mark `session` logged in.
  ///
  /// A rejected attempt leaves the session's state untouched.
  pub fn authenticate(
    &self,
    session: &SessionId,
    username: &str,
    password: &str,
  ) -> bool {
    if !self.verifier.verify(username, password) {
      return false;
    }
    self.sessions().insert(session.clone());
    true
  }

  /// Return `session` to `LoggedOut`, whatever its current state.
  pub fn logout(&self, session: &SessionId) {
    self.sessions().remove(session);
  }

  pub fn is_logged_in(&self, session: &SessionId) -> bool {
    self.sessions().contains(session)
  }

  pub fn state(&self, session: &SessionId) -> SessionState {
    if self.is_logged_in(session) {
      SessionState::LoggedIn
    } else {
      SessionState::LoggedOut
    }
  }

  pub fn hint(&self) -> Option<String> { self.verifier.hint() }

  fn sessions(&self) -> MutexGuard<'_, HashSet<SessionId>> {
    // The set stays consistent even if a holder panicked mid-operation.
    self.logged_in.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl fmt::Debug for SessionGate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SessionGate")
      .field("sessions", &self.sessions().len())
      .finish_non_exhaustive()
  }
}
