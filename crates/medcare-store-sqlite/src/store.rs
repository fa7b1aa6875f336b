//! [`SqliteStore`], the SQLite implementation of [`PatientStore`].

use std::path::Path;

use chrono::Utc;
use medcare_core::{
  RegisterError, RegistrationError,
  patient::{NewPatient, PatientRecord},
  store::PatientStore,
};

use crate::{
  Error, Result,
  encode::{RawPatient, encode_blood_type, encode_date, encode_dt, encode_gender},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A patient registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// True when `err` is SQLite rejecting a row for a `UNIQUE` column.
///
/// `phone` is the only such column in the `patients` table.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.code == rusqlite::ErrorCode::ConstraintViolation
        && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── PatientStore impl ───────────────────────────────────────────────────────

impl PatientStore for SqliteStore {
  type Error = Error;

  async fn list_patients<'a>(
    &'a self,
    filter: Option<&'a str>,
  ) -> Result<Vec<PatientRecord>> {
    let needle = filter.filter(|f| !f.is_empty()).map(str::to_owned);

    let raws: Vec<RawPatient> = self
      .conn
      .call(move |conn| {
        // `instr` is a case-sensitive substring test and, unlike LIKE, treats
        // `%` and `_` in the needle literally.
        let sql = format!(
          "SELECT {}
           FROM patients
           WHERE ?1 IS NULL
              OR instr(first_name, ?1) > 0
              OR instr(last_name,  ?1) > 0
              OR instr(phone,      ?1) > 0
           ORDER BY id DESC",
          RawPatient::COLUMNS,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![needle], RawPatient::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPatient::into_record).collect()
  }

  async fn register_patient(
    &self,
    patient: NewPatient,
  ) -> Result<PatientRecord, RegisterError<Error>> {
    let created_at = Utc::now();

    let first_name     = patient.first_name().to_owned();
    let last_name      = patient.last_name().to_owned();
    let phone          = patient.phone().to_owned();
    let dob_str        = patient.dob().map(encode_date);
    let gender_str     = patient.gender().map(encode_gender);
    let address        = patient.address().map(str::to_owned);
    let blood_type_str = patient.blood_type().map(encode_blood_type);
    let created_at_str = encode_dt(created_at);

    // The UNIQUE constraint on `phone` is the only duplicate check: the
    // insert either writes the whole row or nothing.
    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO patients (
             first_name, last_name, dob, gender, phone,
             address, blood_type, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            first_name,
            last_name,
            dob_str,
            gender_str,
            phone,
            address,
            blood_type_str,
            created_at_str,
          ],
        );
        match result {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(|e| RegisterError::Storage(Error::Database(e)))?;

    match inserted {
      Some(id) => {
        tracing::debug!(id, "inserted patient");
        Ok(patient.into_record(id, created_at))
      }
      None => Err(RegistrationError::DuplicatePhone(patient.phone().to_owned()).into()),
    }
  }

  async fn count_patients(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }
}
