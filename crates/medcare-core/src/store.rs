//! The `PatientStore` trait.
//!
//! Implemented by storage backends (e.g. `medcare-store-sqlite`). The HTTP
//! layers (`medcare-api`, `medcare-web`) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  patient::{NewPatient, PatientRecord},
  registration::RegisterError,
};

/// Abstraction over the patient table.
///
/// Records are create-and-read only: there is no update or delete.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PatientStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return patients newest first (identifier descending).
  ///
  /// A `Some` non-empty `filter` keeps only records whose first name, last
  /// name, or phone contains it as a case-sensitive substring. `None` and
  /// `Some("")` return everything.
  fn list_patients<'a>(
    &'a self,
    filter: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<PatientRecord>, Self::Error>> + Send + 'a;

  /// Insert a validated patient and return the stored record.
  ///
  /// The identifier and `created_at` are assigned by the store. A phone
  /// already present must be detected by the storage engine's own uniqueness
  /// constraint during the insert, and reported as
  /// [`RegistrationError::DuplicatePhone`](crate::RegistrationError::DuplicatePhone)
  /// with nothing written.
  fn register_patient(
    &self,
    patient: NewPatient,
  ) -> impl Future<Output = Result<PatientRecord, RegisterError<Self::Error>>>
  + Send
  + '_;

  /// Total number of stored patients.
  fn count_patients(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
