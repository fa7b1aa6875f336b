//! Error types for `medcare-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("unknown blood type: {0:?}")]
  UnknownBloodType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
