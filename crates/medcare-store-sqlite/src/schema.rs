//! SQL schema for the MedCare SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are insert-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS patients (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    dob         TEXT,            -- YYYY-MM-DD
    gender      TEXT,            -- 'Male' | 'Female' | 'Other'
    phone       TEXT NOT NULL UNIQUE,
    address     TEXT,
    blood_type  TEXT,            -- 'A+' .. 'AB-' | 'Unknown'
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

PRAGMA user_version = 1;
";
