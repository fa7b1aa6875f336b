//! Patients screen: list, search and the registration form.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use medcare_core::{
  RegisterError, Registration, RegistrationError, RequiredField,
  registration::register_patient,
  store::PatientStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  pages::{self, Notice, NoticeKind, PatientsView},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:          Option<String>,
  /// Set by the redirect that follows a successful registration.
  pub registered: Option<i64>,
}

/// `GET /patients[?q=<text>][&registered=<id>]`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>, Error>
where
  S: PatientStore + Clone + 'static,
{
  let search = params.q.as_deref().filter(|q| !q.is_empty());
  let patients = state
    .store
    .list_patients(search)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let notices: Vec<Notice> = params
    .registered
    .map(|_| Notice::new(NoticeKind::Success, "Patient registered successfully!"))
    .into_iter()
    .collect();

  Ok(Html(pages::patients(&state.config, &PatientsView {
    patients: &patients,
    search,
    notices:  &notices,
    form:     None,
  })))
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// Raw form fields, kept as text so a rejected submission can be re-rendered
/// exactly as typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name:  String,
  #[serde(default)]
  pub phone:      String,
  #[serde(default)]
  pub gender:     String,
  #[serde(default)]
  pub dob:        String,
  #[serde(default)]
  pub blood_type: String,
  #[serde(default)]
  pub address:    String,
}

impl RegisterForm {
  /// Labels of the starred fields left blank, in the order the form shows
  /// them. Gender is optional in storage but the form requires it.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    [
      (RequiredField::FirstName.label(), &self.first_name),
      ("Gender", &self.gender),
      (RequiredField::LastName.label(), &self.last_name),
      (RequiredField::Phone.label(), &self.phone),
    ]
    .into_iter()
    .filter(|(_, value)| non_empty(value).is_none())
    .map(|(label, _)| label)
    .collect()
  }

  /// Parse the enumerated and date fields. Required-field checks are left to
  /// [`Registration::validate`].
  pub fn to_registration(&self) -> Result<Registration, Error> {
    let gender = non_empty(&self.gender)
      .map(str::parse)
      .transpose()
      .map_err(|e: medcare_core::Error| Error::BadRequest(e.to_string()))?;
    let blood_type = non_empty(&self.blood_type)
      .map(str::parse)
      .transpose()
      .map_err(|e: medcare_core::Error| Error::BadRequest(e.to_string()))?;
    let dob = non_empty(&self.dob)
      .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
      .transpose()
      .map_err(|_| Error::BadRequest("date of birth must be YYYY-MM-DD".to_owned()))?;

    Ok(Registration {
      first_name: self.first_name.clone(),
      last_name: self.last_name.clone(),
      phone: self.phone.clone(),
      gender,
      dob,
      blood_type,
      address: non_empty(&self.address).map(str::to_owned),
    })
  }
}

fn non_empty(s: &str) -> Option<&str> {
  let s = s.trim();
  (!s.is_empty()).then_some(s)
}

/// `POST /patients`
///
/// Success redirects back to the list (303) so a browser refresh does not
/// resubmit. Rejections re-render the screen with the submitted values.
pub async fn register<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Form(form): Form<RegisterForm>,
) -> Result<Response, Error>
where
  S: PatientStore + Clone + 'static,
{
  let missing = form.missing_fields();
  if !missing.is_empty() {
    tracing::info!(fields = ?missing, "registration rejected");
    let notice = missing_fields_notice(&missing);
    return rejected(&state, &form, StatusCode::UNPROCESSABLE_ENTITY, notice).await;
  }

  let registration = form.to_registration()?;

  let rejection = match register_patient(state.store.as_ref(), registration).await {
    Ok(record) => {
      tracing::info!(id = record.id, "patient registered");
      return Ok(Redirect::to(&format!("/patients?registered={}", record.id)).into_response());
    }
    Err(RegisterError::Rejected(r)) => r,
    Err(RegisterError::Storage(e)) => return Err(Error::Store(Box::new(e))),
  };

  let (status, notice) = match &rejection {
    RegistrationError::MissingRequiredField(fields) => {
      let labels: Vec<&str> = fields.iter().map(|f| f.label()).collect();
      (StatusCode::UNPROCESSABLE_ENTITY, missing_fields_notice(&labels))
    }
    RegistrationError::DuplicatePhone(_) => (
      StatusCode::CONFLICT,
      Notice::new(NoticeKind::Error, "This phone number is already registered!"),
    ),
  };
  tracing::info!(reason = %rejection, "registration rejected");
  rejected(&state, &form, status, notice).await
}

fn missing_fields_notice(labels: &[&str]) -> Notice {
  Notice::new(
    NoticeKind::Warning,
    format!("Please fill all required fields (*): {}", labels.join(", ")),
  )
}

/// Re-render the patients screen with `form` prefilled.
async fn rejected<S>(
  state: &AppState<S>,
  form: &RegisterForm,
  status: StatusCode,
  notice: Notice,
) -> Result<Response, Error>
where
  S: PatientStore + Clone + 'static,
{
  let patients = state
    .store
    .list_patients(None)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let page = pages::patients(&state.config, &PatientsView {
    patients: &patients,
    search:   None,
    notices:  &[notice],
    form:     Some(form),
  });
  Ok((status, Html(page)).into_response())
}
