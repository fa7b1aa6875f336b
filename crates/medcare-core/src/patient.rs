//! Patient records: the single persistent entity of the registry.
//!
//! A record is written exactly once by registration and never updated or
//! deleted afterwards.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
  Other,
}

impl Gender {
  /// Every option offered by the entry form, in display order.
  pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

  /// The label shown in forms and stored in the `gender` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Male => "Male",
      Self::Female => "Female",
      Self::Other => "Other",
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Gender {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|g| g.as_str() == s)
      .ok_or_else(|| Error::UnknownGender(s.to_owned()))
  }
}

// ─── Blood type ──────────────────────────────────────────────────────────────

/// ABO group plus Rh factor, or `Unknown` when not yet typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
  #[serde(rename = "A+")]
  APositive,
  #[serde(rename = "A-")]
  ANegative,
  #[serde(rename = "B+")]
  BPositive,
  #[serde(rename = "B-")]
  BNegative,
  #[serde(rename = "O+")]
  OPositive,
  #[serde(rename = "O-")]
  ONegative,
  #[serde(rename = "AB+")]
  AbPositive,
  #[serde(rename = "AB-")]
  AbNegative,
  Unknown,
}

impl BloodType {
  pub const ALL: [BloodType; 9] = [
    BloodType::APositive,
    BloodType::ANegative,
    BloodType::BPositive,
    BloodType::BNegative,
    BloodType::OPositive,
    BloodType::ONegative,
    BloodType::AbPositive,
    BloodType::AbNegative,
    BloodType::Unknown,
  ];

  /// Must match the `serde(rename)` labels above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::APositive => "A+",
      Self::ANegative => "A-",
      Self::BPositive => "B+",
      Self::BNegative => "B-",
      Self::OPositive => "O+",
      Self::ONegative => "O-",
      Self::AbPositive => "AB+",
      Self::AbNegative => "AB-",
      Self::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for BloodType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BloodType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|b| b.as_str() == s)
      .ok_or_else(|| Error::UnknownBloodType(s.to_owned()))
  }
}

// ─── PatientRecord ───────────────────────────────────────────────────────────

/// A stored patient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
  /// Store-assigned; increases with insertion order and never changes.
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub dob:        Option<NaiveDate>,
  pub gender:     Option<Gender>,
  /// Unique across the whole table.
  pub phone:      String,
  pub address:    Option<String>,
  pub blood_type: Option<BloodType>,
  /// Server-assigned at insert time.
  pub created_at: DateTime<Utc>,
}

impl PatientRecord {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Case-sensitive substring match over first name, last name and phone.
  ///
  /// Mirrors the filter applied by
  /// [`PatientStore::list_patients`](crate::store::PatientStore::list_patients).
  pub fn matches(&self, filter: &str) -> bool {
    self.first_name.contains(filter)
      || self.last_name.contains(filter)
      || self.phone.contains(filter)
  }
}

// ─── NewPatient ──────────────────────────────────────────────────────────────

/// A validated registration, ready for insertion.
///
/// Only obtainable through [`Registration::validate`](crate::registration::Registration::validate),
/// so required fields are always non-empty and trimmed. `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
  pub(crate) first_name: String,
  pub(crate) last_name:  String,
  pub(crate) phone:      String,
  pub(crate) gender:     Option<Gender>,
  pub(crate) dob:        Option<NaiveDate>,
  pub(crate) blood_type: Option<BloodType>,
  pub(crate) address:    Option<String>,
}

impl NewPatient {
  pub fn first_name(&self) -> &str { &self.first_name }

  pub fn last_name(&self) -> &str { &self.last_name }

  pub fn phone(&self) -> &str { &self.phone }

  pub fn gender(&self) -> Option<Gender> { self.gender }

  pub fn dob(&self) -> Option<NaiveDate> { self.dob }

  pub fn blood_type(&self) -> Option<BloodType> { self.blood_type }

  pub fn address(&self) -> Option<&str> { self.address.as_deref() }

  /// Attach the store-assigned identity, producing the persisted record.
  pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> PatientRecord {
    PatientRecord {
      id,
      first_name: self.first_name,
      last_name: self.last_name,
      dob: self.dob,
      gender: self.gender,
      phone: self.phone,
      address: self.address,
      blood_type: self.blood_type,
      created_at,
    }
  }
}
