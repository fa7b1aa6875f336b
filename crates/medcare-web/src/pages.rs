//! Server-rendered HTML for every screen.
//!
//! Pages are plain `String`s assembled with `format!`; every value that
//! originates from a user or the database goes through [`escape`].

use std::fmt::Write as _;

use chrono::Utc;
use medcare_core::patient::{BloodType, Gender, PatientRecord};

use crate::{ServerConfig, handlers::patients::RegisterForm};

// ─── Modules ──────────────────────────────────────────────────────────────────

/// Entries of the sidebar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
  Dashboard,
  Patients,
  Doctors,
  Staff,
  Lab,
  Pharmacy,
  Appointments,
  Departments,
  Reports,
}

impl Module {
  pub const ALL: [Module; 9] = [
    Module::Dashboard,
    Module::Patients,
    Module::Doctors,
    Module::Staff,
    Module::Lab,
    Module::Pharmacy,
    Module::Appointments,
    Module::Departments,
    Module::Reports,
  ];

  pub fn title(&self) -> &'static str {
    match self {
      Self::Dashboard => "Dashboard",
      Self::Patients => "Patients",
      Self::Doctors => "Doctors",
      Self::Staff => "Staff / Employees",
      Self::Lab => "Lab & Investigations",
      Self::Pharmacy => "Pharmacy Inventory",
      Self::Appointments => "Appointments",
      Self::Departments => "Departments",
      Self::Reports => "Reports",
    }
  }

  pub fn slug(&self) -> &'static str {
    match self {
      Self::Dashboard => "dashboard",
      Self::Patients => "patients",
      Self::Doctors => "doctors",
      Self::Staff => "staff",
      Self::Lab => "lab",
      Self::Pharmacy => "pharmacy",
      Self::Appointments => "appointments",
      Self::Departments => "departments",
      Self::Reports => "reports",
    }
  }

  pub fn href(&self) -> String {
    match self {
      Self::Dashboard | Self::Patients => format!("/{}", self.slug()),
      _ => format!("/modules/{}", self.slug()),
    }
  }

  /// Modules with no behaviour yet, reachable under `/modules/{slug}`.
  pub fn placeholder(slug: &str) -> Option<Module> {
    Self::ALL
      .into_iter()
      .filter(|m| !matches!(m, Self::Dashboard | Self::Patients))
      .find(|m| m.slug() == slug)
  }
}

// ─── Notices ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Info,
  Warning,
  Error,
}

/// A one-line banner shown above page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind:    NoticeKind,
  pub message: String,
}

impl Notice {
  pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into() }
  }

  fn render(&self) -> String {
    let class = match self.kind {
      NoticeKind::Success => "success",
      NoticeKind::Info => "info",
      NoticeKind::Warning => "warning",
      NoticeKind::Error => "error",
    };
    format!(
      r#"<div class="notice {class}" role="status">{}</div>"#,
      escape(&self.message)
    )
  }
}

fn render_notices(notices: &[Notice]) -> String {
  notices.iter().map(Notice::render).collect()
}

// ─── Escaping ─────────────────────────────────────────────────────────────────

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

// ─── Chrome ───────────────────────────────────────────────────────────────────

const STYLE: &str = "
body { margin: 0; font-family: system-ui, sans-serif; display: flex; min-height: 100vh; }
nav { width: 15rem; background: #f0f2f6; padding: 1rem; }
nav a { display: block; padding: .35rem .5rem; color: inherit; text-decoration: none; border-radius: .25rem; }
nav a.active { background: #dfe3ea; font-weight: 600; }
main { flex: 1; padding: 1.5rem 2rem; }
.notice { padding: .6rem .9rem; border-radius: .25rem; margin: .5rem 0; }
.success { background: #e3f5e6; } .info { background: #e5eefb; }
.warning { background: #fff6d9; } .error { background: #fde4e4; }
.metrics { display: flex; gap: 2rem; }
.metric .value { font-size: 1.8rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .35rem .5rem; text-align: left; }
form.grid { display: grid; grid-template-columns: repeat(2, minmax(12rem, 1fr)); gap: .75rem 1.5rem; }
label { display: flex; flex-direction: column; gap: .2rem; }
footer { margin-top: 2rem; color: #777; font-size: .85rem; }
";

fn document(config: &ServerConfig, title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
     <title>{title} · {system}</title>\n<style>{STYLE}</style>\n</head>\n\
     <body>\n{body}\n</body>\n</html>\n",
    title = escape(title),
    system = escape(&config.system_name),
  )
}

fn footer(config: &ServerConfig) -> String {
  format!(
    "<footer>{} • {}</footer>",
    escape(&config.system_name),
    Utc::now().format("%Y-%m-%d")
  )
}

/// Sidebar, heading and footer around the content of a logged-in page.
fn layout(config: &ServerConfig, active: Module, content: &str) -> String {
  let mut nav = String::from("<nav>\n<h2>MedCare HMS</h2>\n<hr>\n");
  for module in Module::ALL {
    let class = if module == active { " class=\"active\"" } else { "" };
    let _ = writeln!(
      nav,
      r#"<a href="{}"{class}>{}</a>"#,
      module.href(),
      escape(module.title())
    );
  }
  nav.push_str(
    "<hr>\n<form method=\"post\" action=\"/logout\">\
     <button type=\"submit\">Logout</button></form>\n</nav>",
  );

  let body = format!(
    "{nav}\n<main>\n<h1>MedCare Hospital → {}</h1>\n<hr>\n{content}\n{}\n</main>",
    escape(active.title()),
    footer(config),
  );
  document(config, active.title(), &body)
}

// ─── Login ────────────────────────────────────────────────────────────────────

pub fn login(config: &ServerConfig, notices: &[Notice], hint: Option<&str>) -> String {
  let hint = hint
    .map(|h| Notice::new(NoticeKind::Info, format!("Use: {h}")).render())
    .unwrap_or_default();
  let body = format!(
    "<main>\n<h1>{system}</h1>\n<h2>Login (Demo Mode)</h2>\n{notices}{hint}\n\
     <form method=\"post\" action=\"/login\">\n\
     <label>Username <input name=\"username\" autocomplete=\"username\" autofocus></label>\n\
     <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\n\
     <button type=\"submit\">Login</button>\n</form>\n{footer}\n</main>",
    system = escape(&config.system_name),
    notices = render_notices(notices),
    footer = footer(config),
  );
  document(config, "Login", &body)
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

pub fn dashboard(config: &ServerConfig, total_patients: u64) -> String {
  let metrics = [
    ("Total Patients", total_patients.to_string()),
    ("Active Doctors", "0 (module in progress)".to_owned()),
    ("System Status", "Online".to_owned()),
  ];
  let mut content = String::from("<section class=\"metrics\">\n");
  for (label, value) in metrics {
    let _ = writeln!(
      content,
      r#"<div class="metric"><div class="label">{label}</div><div class="value">{}</div></div>"#,
      escape(&value)
    );
  }
  content.push_str("</section>");
  layout(config, Module::Dashboard, &content)
}

// ─── Patients ─────────────────────────────────────────────────────────────────

/// Everything the patients screen needs to render.
pub struct PatientsView<'a> {
  pub patients: &'a [PatientRecord],
  pub search:   Option<&'a str>,
  pub notices:  &'a [Notice],
  /// Values to re-populate the registration form with after a rejection.
  pub form:     Option<&'a RegisterForm>,
}

pub fn patients(config: &ServerConfig, view: &PatientsView<'_>) -> String {
  let search = view.search.unwrap_or_default();
  let mut content = render_notices(view.notices);

  let _ = write!(
    content,
    "<section id=\"list\">\n<h2>Patient List</h2>\n\
     <form method=\"get\" action=\"/patients\">\
     <label>Search by name or phone <input name=\"q\" value=\"{}\"></label> \
     <button type=\"submit\">Search</button></form>\n",
    escape(search)
  );
  content.push_str(&patient_table(view.patients));
  content.push_str("</section>\n");

  content.push_str(&registration_form(view.form));
  layout(config, Module::Patients, &content)
}

fn patient_table(patients: &[PatientRecord]) -> String {
  if patients.is_empty() {
    return "<p class=\"empty\">No patients found.</p>\n".to_owned();
  }

  let mut table = String::from(
    "<table>\n<thead><tr><th>ID</th><th>First Name</th><th>Last Name</th>\
     <th>Date of Birth</th><th>Gender</th><th>Phone</th><th>Address</th>\
     <th>Blood Group</th><th>Registered</th></tr></thead>\n<tbody>\n",
  );
  for p in patients {
    let _ = writeln!(
      table,
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
       <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
      p.id,
      escape(&p.first_name),
      escape(&p.last_name),
      p.dob.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
      p.gender.map(|g| g.as_str()).unwrap_or_default(),
      escape(&p.phone),
      escape(p.address.as_deref().unwrap_or_default()),
      p.blood_type.map(|b| b.as_str()).unwrap_or_default(),
      p.created_at.format("%Y-%m-%d %H:%M:%S"),
    );
  }
  table.push_str("</tbody>\n</table>\n");
  table
}

fn options<'a>(labels: impl IntoIterator<Item = &'a str>, selected: &str) -> String {
  labels
    .into_iter()
    .map(|label| {
      let sel = if label == selected { " selected" } else { "" };
      format!("<option{sel}>{}</option>", escape(label))
    })
    .collect()
}

fn registration_form(prefill: Option<&RegisterForm>) -> String {
  let empty = RegisterForm::default();
  let f = prefill.unwrap_or(&empty);

  format!(
    "<section id=\"register\">\n<h2>Add New Patient</h2>\n\
     <form class=\"grid\" method=\"post\" action=\"/patients\">\n\
     <label>First Name* <input name=\"first_name\" value=\"{first}\"></label>\n\
     <label>Gender* <select name=\"gender\">{genders}</select></label>\n\
     <label>Last Name* <input name=\"last_name\" value=\"{last}\"></label>\n\
     <label>Date of Birth <input name=\"dob\" type=\"date\" value=\"{dob}\"></label>\n\
     <label>Phone Number* <input name=\"phone\" value=\"{phone}\"></label>\n\
     <label>Blood Group <select name=\"blood_type\">{bloods}</select></label>\n\
     <label>Address <textarea name=\"address\">{address}</textarea></label>\n\
     <div><button type=\"submit\">Register Patient</button></div>\n\
     </form>\n</section>",
    first = escape(&f.first_name),
    last = escape(&f.last_name),
    phone = escape(&f.phone),
    dob = escape(&f.dob),
    address = escape(&f.address),
    genders = options(Gender::ALL.iter().map(|g| g.as_str()), &f.gender),
    bloods = options(BloodType::ALL.iter().map(|b| b.as_str()), &f.blood_type),
  )
}

// ─── Placeholders ─────────────────────────────────────────────────────────────

pub fn placeholder(config: &ServerConfig, module: Module) -> String {
  let content = format!(
    "<div class=\"notice info\">\n<h3>{title}</h3>\n\
     <p>This module is prepared for implementation.</p>\n\
     <p>Current status: <strong>placeholder / in development</strong></p>\n</div>",
    title = escape(module.title()),
  );
  layout(config, module, &content)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_covers_markup_characters() {
    assert_eq!(
      escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
    assert_eq!(escape("Ayesha"), "Ayesha");
  }

  #[test]
  fn placeholder_slugs_exclude_real_modules() {
    assert_eq!(Module::placeholder("doctors"), Some(Module::Doctors));
    assert_eq!(Module::placeholder("lab"), Some(Module::Lab));
    assert_eq!(Module::placeholder("patients"), None);
    assert_eq!(Module::placeholder("dashboard"), None);
    assert_eq!(Module::placeholder("billing"), None);
  }

  #[test]
  fn sidebar_links_every_module() {
    let html = dashboard(&ServerConfig::default(), 3);
    for module in Module::ALL {
      assert!(html.contains(&format!("href=\"{}\"", module.href())), "{module:?}");
    }
    assert!(html.contains(r#"<div class="value">3</div>"#));
  }

  #[test]
  fn form_prefill_selects_previous_choices() {
    let form = RegisterForm {
      first_name: "Ayesha".into(),
      gender:     "Other".into(),
      blood_type: "AB-".into(),
      ..RegisterForm::default()
    };
    let html = registration_form(Some(&form));
    assert!(html.contains("<option selected>Other</option>"));
    assert!(html.contains("<option selected>AB-</option>"));
    assert!(html.contains(r#"name="first_name" value="Ayesha""#));
  }
}
