//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, and
//! enumerations as their display labels (`"Female"`, `"AB+"`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use medcare_core::patient::{BloodType, Gender, PatientRecord};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Accepts RFC 3339 as well as the `YYYY-MM-DD HH:MM:SS` form SQLite's
/// `CURRENT_TIMESTAMP` writes (always UTC).
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate
// ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Gender / BloodType
// ───────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.as_str() }

pub fn decode_gender(s: &str) -> Result<Gender> { Ok(s.parse()?) }

pub fn encode_blood_type(b: BloodType) -> &'static str { b.as_str() }

pub fn decode_blood_type(s: &str) -> Result<BloodType> { Ok(s.parse()?) }

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Column values exactly as read from a `patients` row.
pub struct RawPatient {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub dob:        Option<String>,
  pub gender:     Option<String>,
  pub phone:      String,
  pub address:    Option<String>,
  pub blood_type: Option<String>,
  pub created_at: String,
}

impl RawPatient {
  /// Column order used by [`RawPatient::from_row`].
  pub const COLUMNS: &'static str = "id, first_name, last_name, dob, gender, \
                                     phone, address, blood_type, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPatient {
      id:         row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      dob:        row.get(3)?,
      gender:     row.get(4)?,
      phone:      row.get(5)?,
      address:    row.get(6)?,
      blood_type: row.get(7)?,
      created_at: row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<PatientRecord> {
    Ok(PatientRecord {
      id:         self.id,
      first_name: self.first_name,
      last_name:  self.last_name,
      // An empty string is what an unset date column holds in older databases.
      dob:        self
        .dob
        .filter(|s| !s.is_empty())
        .as_deref()
        .map(decode_date)
        .transpose()?,
      gender:     self.gender.as_deref().map(decode_gender).transpose()?,
      phone:      self.phone,
      address:    self.address,
      blood_type: self
        .blood_type
        .as_deref()
        .map(decode_blood_type)
        .transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_dt_accepts_rfc3339_and_sqlite_timestamps() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);

    let legacy = decode_dt("2024-03-05 14:07:09").unwrap();
    assert_eq!(legacy.to_rfc3339(), "2024-03-05T14:07:09+00:00");

    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn dates_use_iso_calendar_form() {
    let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    assert_eq!(encode_date(d), "2000-01-01");
    assert_eq!(decode_date("2000-01-01").unwrap(), d);
    assert!(decode_date("01/01/2000").is_err());
  }

  #[test]
  fn unknown_labels_surface_as_core_errors() {
    assert!(matches!(
      decode_blood_type("Z+"),
      Err(Error::Core(medcare_core::Error::UnknownBloodType(_)))
    ));
    assert!(matches!(
      decode_gender("F"),
      Err(Error::Core(medcare_core::Error::UnknownGender(_)))
    ));
  }
}
