//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use medcare_core::{
  RegisterError, Registration, RegistrationError, RequiredField,
  patient::{BloodType, Gender},
  registration::register_patient,
  store::PatientStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ayesha() -> Registration {
  Registration::new("Ayesha", "Khan", "03001234567")
    .gender(Gender::Female)
    .dob(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    .blood_type(BloodType::OPositive)
}

async fn register(s: &SqliteStore, first: &str, last: &str, phone: &str) -> i64 {
  register_patient(s, Registration::new(first, last, phone))
    .await
    .unwrap()
    .id
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_list_returns_record() {
  let s = store().await;

  let record = register_patient(&s, ayesha()).await.unwrap();
  assert_eq!(record.id, 1);
  assert_eq!(record.first_name, "Ayesha");
  assert_eq!(record.phone, "03001234567");

  let all = s.list_patients(None).await.unwrap();
  assert_eq!(all.len(), 1);
  let listed = &all[0];
  assert_eq!(listed.id, record.id);
  assert_eq!(listed.last_name, "Khan");
  assert_eq!(listed.gender, Some(Gender::Female));
  assert_eq!(listed.dob, NaiveDate::from_ymd_opt(2000, 1, 1));
  assert_eq!(listed.blood_type, Some(BloodType::OPositive));
  assert_eq!(listed.address, None);
  assert_eq!(listed.created_at, record.created_at);
}

#[tokio::test]
async fn duplicate_phone_is_rejected_and_nothing_written() {
  let s = store().await;
  register_patient(&s, ayesha()).await.unwrap();

  let err = register_patient(&s, Registration::new("Sara", "Ali", "03001234567"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    RegisterError::Rejected(RegistrationError::DuplicatePhone(ref p)) if p == "03001234567"
  ));

  let all = s.list_patients(None).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].first_name, "Ayesha");
  assert_eq!(s.count_patients().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_check_applies_after_trimming() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "03001234567").await;

  let err = register_patient(&s, Registration::new("B", "C", "  03001234567  "))
    .await
    .unwrap_err();
  assert!(matches!(
    err.rejection(),
    Some(RegistrationError::DuplicatePhone(_))
  ));
}

#[tokio::test]
async fn empty_first_name_creates_nothing() {
  let s = store().await;

  let err = register_patient(&s, Registration::new("", "Khan", "03001234567"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    RegisterError::Rejected(RegistrationError::MissingRequiredField(ref f))
      if f == &[RequiredField::FirstName]
  ));
  assert_eq!(s.count_patients().await.unwrap(), 0);
}

#[tokio::test]
async fn whitespace_only_fields_create_nothing() {
  let s = store().await;
  for (first, last, phone) in [(" ", "Khan", "1"), ("Ayesha", "\t", "2"), ("Ayesha", "Khan", "   ")] {
    let err = register_patient(&s, Registration::new(first, last, phone))
      .await
      .unwrap_err();
    assert!(matches!(
      err.rejection(),
      Some(RegistrationError::MissingRequiredField(_))
    ));
  }
  assert!(s.list_patients(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn identifiers_increase_with_insertion_order() {
  let s = store().await;
  let a = register(&s, "Ayesha", "Khan", "100").await;
  let b = register(&s, "Bilal", "Raza", "200").await;
  let c = register(&s, "Chen", "Wei", "300").await;
  assert!(a < b && b < c);
}

#[tokio::test]
async fn listing_after_rejected_duplicate_stays_ordered() {
  let s = store().await;
  let a = register(&s, "Ayesha", "Khan", "100").await;
  assert!(register_patient(&s, Registration::new("X", "Y", "100")).await.is_err());
  let b = register(&s, "Bilal", "Raza", "200").await;
  assert!(b > a);

  let ids: Vec<i64> = s.list_patients(None).await.unwrap().iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![b, a]);
}

#[tokio::test]
async fn address_is_stored_trimmed() {
  let s = store().await;
  register_patient(&s, ayesha().address("  House 4, Street 9  ")).await.unwrap();
  let all = s.list_patients(None).await.unwrap();
  assert_eq!(all[0].address.as_deref(), Some("House 4, Street 9"));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_without_filter_is_newest_first() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "100").await;
  register(&s, "Bilal", "Raza", "200").await;
  register(&s, "Chen", "Wei", "300").await;

  let names: Vec<String> = s
    .list_patients(None)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.first_name)
    .collect();
  assert_eq!(names, ["Chen", "Bilal", "Ayesha"]);
}

#[tokio::test]
async fn empty_filter_returns_everything() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "100").await;
  register(&s, "Bilal", "Raza", "200").await;
  assert_eq!(s.list_patients(Some("")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn filter_matches_first_last_or_phone() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "03001234567").await;
  register(&s, "Bilal", "Ayub", "03219876543").await;
  register(&s, "Chen", "Wei", "04211112222").await;

  let by_first: Vec<_> = s.list_patients(Some("Bil")).await.unwrap();
  assert_eq!(by_first.len(), 1);
  assert_eq!(by_first[0].first_name, "Bilal");

  // "Ay" hits Ayesha's first name and Bilal's last name.
  let by_either: Vec<String> = s
    .list_patients(Some("Ay"))
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.first_name)
    .collect();
  assert_eq!(by_either, ["Bilal", "Ayesha"]);

  let by_phone = s.list_patients(Some("1111")).await.unwrap();
  assert_eq!(by_phone.len(), 1);
  assert_eq!(by_phone[0].last_name, "Wei");

  assert!(s.list_patients(Some("Zaid")).await.unwrap().is_empty());
}

#[tokio::test]
async fn filter_is_case_sensitive() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "100").await;

  assert_eq!(s.list_patients(Some("Khan")).await.unwrap().len(), 1);
  assert!(s.list_patients(Some("khan")).await.unwrap().is_empty());
  assert!(s.list_patients(Some("AYESHA")).await.unwrap().is_empty());
}

#[tokio::test]
async fn filter_treats_wildcards_literally() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "100").await;
  register(&s, "Bilal", "Raza_Ali", "200").await;

  assert!(s.list_patients(Some("%")).await.unwrap().is_empty());
  let underscored = s.list_patients(Some("_")).await.unwrap();
  assert_eq!(underscored.len(), 1);
  assert_eq!(underscored[0].first_name, "Bilal");
}

#[tokio::test]
async fn filtered_results_agree_with_record_matches() {
  let s = store().await;
  register(&s, "Ayesha", "Khan", "03001234567").await;
  register(&s, "Bilal", "Khanzada", "03219876543").await;
  register(&s, "Chen", "Wei", "04211112222").await;

  let all = s.list_patients(None).await.unwrap();
  for needle in ["Khan", "0321", "e", "Wei", "zzz"] {
    let expected: Vec<i64> = all.iter().filter(|p| p.matches(needle)).map(|p| p.id).collect();
    let got: Vec<i64> = s
      .list_patients(Some(needle))
      .await
      .unwrap()
      .iter()
      .map(|p| p.id)
      .collect();
    assert_eq!(got, expected, "needle {needle:?}");
  }
}

// ─── Counting ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn count_tracks_successful_registrations() {
  let s = store().await;
  assert_eq!(s.count_patients().await.unwrap(), 0);
  register(&s, "Ayesha", "Khan", "100").await;
  register(&s, "Bilal", "Raza", "200").await;
  assert!(register_patient(&s, Registration::new("Dup", "Dup", "200")).await.is_err());
  assert_eq!(s.count_patients().await.unwrap(), 2);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn records_survive_reopen() {
  let dir = std::env::temp_dir().join(format!(
    "medcare-store-test-{}-{}",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("hospital.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    register_patient(&s, ayesha()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let all = s.list_patients(None).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].phone, "03001234567");

  // Schema init is idempotent and the uniqueness constraint persists.
  assert!(register_patient(&s, ayesha()).await.is_err());

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
