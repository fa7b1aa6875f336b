//! Patient registration: input validation and the register operation.
//!
//! Validation happens before any storage access. Phone uniqueness is never
//! checked here; the store reports it from its own constraint at insert time.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  patient::{BloodType, Gender, NewPatient, PatientRecord},
  store::PatientStore,
};

// ─── Required fields ─────────────────────────────────────────────────────────

/// A field that must be non-empty (after trimming) for registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
  FirstName,
  LastName,
  Phone,
}

impl RequiredField {
  pub fn label(&self) -> &'static str {
    match self {
      Self::FirstName => "First Name",
      Self::LastName => "Last Name",
      Self::Phone => "Phone Number",
    }
  }
}

impl fmt::Display for RequiredField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A registration refused for a reason the operator can fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
  #[error("required fields missing: {}", join_labels(.0))]
  MissingRequiredField(Vec<RequiredField>),

  #[error("phone number {0:?} is already registered")]
  DuplicatePhone(String),
}

fn join_labels(fields: &[RequiredField]) -> String {
  fields
    .iter()
    .map(RequiredField::label)
    .collect::<Vec<_>>()
    .join(", ")
}

/// The failure type of [`register_patient`] and
/// [`PatientStore::register_patient`].
///
/// `Rejected` errors are user-facing; `Storage` errors are not handled by
/// callers beyond being reported.
#[derive(Debug, Error)]
pub enum RegisterError<E>
where
  E: std::error::Error + 'static,
{
  #[error(transparent)]
  Rejected(#[from] RegistrationError),

  #[error("storage error: {0}")]
  Storage(#[source] E),
}

impl<E: std::error::Error + 'static> RegisterError<E> {
  /// The user-facing reason, if this is not a storage failure.
  pub fn rejection(&self) -> Option<&RegistrationError> {
    match self {
      Self::Rejected(r) => Some(r),
      Self::Storage(_) => None,
    }
  }
}

// ─── Registration input ──────────────────────────────────────────────────────

/// Unvalidated registration input as submitted by the entry form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name:  String,
  #[serde(default)]
  pub phone:      String,
  pub gender:     Option<Gender>,
  pub dob:        Option<NaiveDate>,
  pub blood_type: Option<BloodType>,
  pub address:    Option<String>,
}

impl Registration {
  /// Convenience constructor for the required fields.
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    phone: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      phone: phone.into(),
      ..Self::default()
    }
  }

  pub fn gender(mut self, gender: Gender) -> Self {
    self.gender = Some(gender);
    self
  }

  pub fn dob(mut self, dob: NaiveDate) -> Self {
    self.dob = Some(dob);
    self
  }

  pub fn blood_type(mut self, blood_type: BloodType) -> Self {
    self.blood_type = Some(blood_type);
    self
  }

  pub fn address(mut self, address: impl Into<String>) -> Self {
    self.address = Some(address.into());
    self
  }

  /// Check required fields and normalise whitespace.
  ///
  /// Every missing field is reported, in form order.
  pub fn validate(self) -> Result<NewPatient, RegistrationError> {
    let first_name = self.first_name.trim();
    let last_name = self.last_name.trim();
    let phone = self.phone.trim();

    let missing: Vec<RequiredField> = [
      (RequiredField::FirstName, first_name),
      (RequiredField::LastName, last_name),
      (RequiredField::Phone, phone),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
      return Err(RegistrationError::MissingRequiredField(missing));
    }

    let address = self
      .address
      .as_deref()
      .map(str::trim)
      .filter(|a| !a.is_empty())
      .map(str::to_owned);

    Ok(NewPatient {
      first_name: first_name.to_owned(),
      last_name: last_name.to_owned(),
      phone: phone.to_owned(),
      gender: self.gender,
      dob: self.dob,
      blood_type: self.blood_type,
      address,
    })
  }
}

// ─── Operation ───────────────────────────────────────────────────────────────

/// Validate `input` and, only if it passes, insert it into `store`.
pub async fn register_patient<S>(
  store: &S,
  input: Registration,
) -> Result<PatientRecord, RegisterError<S::Error>>
where
  S: PatientStore,
{
  let patient = input.validate()?;
  store.register_patient(patient).await
}
