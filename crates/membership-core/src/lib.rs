//! Core library for the 28th Odiham membership application.
//!
//! This crate holds everything the public website needs from the
//! application form that is not presentation:
//!
//! - `models`: the submitted field set and the section/age tables
//! - `validation`: sanitizing, content filtering, and field validation
//! - `session`: the per-session submission cooldown and CSRF token
//! - `submit`: the collaborator that receives accepted applications
//! - `form`: the submission lifecycle tying the pieces together
//!
//! The page script binds the results (`ValidationReport`, `FieldIndicator`,
//! `Section`) to visible elements; nothing in here touches a document.

pub mod config;
pub mod form;
pub mod models;
pub mod session;
pub mod submit;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use form::{FormState, MembershipForm, Submission, SubmissionError};
pub use models::{
    recommend_section, recommend_section_on, AgeRange, ApplicationForm, Section, UpperBound,
};
pub use session::{generate_csrf_token, Clock, ManualClock, SubmissionSession, SystemClock};
pub use submit::{Ack, SimulatedSubmitter, SubmitError, Submitter};
pub use utils::{age_on, format_uk_phone, parse_date_of_birth};
pub use validation::{
    check_field, sanitize, sanitize_form, validate, validate_on, FieldError, FieldIndicator,
    ValidationError, ValidationReport, ValidationSummary,
};
