pub mod dashboard;
pub mod login;
pub mod modules;
pub mod patients;
