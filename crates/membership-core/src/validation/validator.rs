use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::models::{fields, ApplicationForm, Section, REQUIRED_FIELDS};
use crate::utils::{age_on, parse_date_of_birth};

use super::{safety, FieldError, ValidationError};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Outcome of one validation pass.
///
/// Errors are kept in the order they were found, which follows the fixed
/// field order of `REQUIRED_FIELDS`. A field can carry more than one error
/// (a blank email is both missing and malformed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

/// Serializable view of a report: pass/fail plus one reason per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ValidationSummary {
    pub ok: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// The field the page should move focus to: the first one that failed
    pub fn focus(&self) -> Option<&str> {
        self.errors.first().map(|e| e.field.as_str())
    }

    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| &e.error)
    }

    pub fn contains(&self, field: &str, error: &ValidationError) -> bool {
        self.errors_for(field).any(|e| e == error)
    }

    /// Distinct failing fields, in report order
    pub fn flagged_fields(&self) -> Vec<&str> {
        let mut flagged: Vec<&str> = Vec::new();
        for e in &self.errors {
            if !flagged.contains(&e.field.as_str()) {
                flagged.push(&e.field);
            }
        }
        flagged
    }

    pub fn is_content_rejected(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.error == ValidationError::ContentRejected)
    }

    /// First blocking message, if any, for the page to show as an alert
    pub fn alert(&self) -> Option<String> {
        self.errors
            .iter()
            .find(|e| e.error.is_blocking())
            .map(|e| e.error.to_string())
    }

    pub fn summary(&self) -> ValidationSummary {
        let mut errors = BTreeMap::new();
        for e in &self.errors {
            errors
                .entry(e.field.clone())
                .or_insert_with(|| e.error.code().to_string());
        }
        ValidationSummary {
            ok: self.is_ok(),
            errors,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("valid");
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Validate an application as of today.
pub fn validate(form: &ApplicationForm) -> ValidationReport {
    validate_on(form, Local::now().date_naive())
}

/// Validate an application, computing the child's age as of `today`.
///
/// Disallowed content ends the pass immediately with a single
/// `ContentRejected` error. Otherwise every check runs and all failures are
/// reported.
pub fn validate_on(form: &ApplicationForm, today: NaiveDate) -> ValidationReport {
    if let Err(rejected) = safety::scan(form) {
        debug!(field = %rejected.field, "Disallowed content in application");
        return ValidationReport::from_errors(vec![rejected]);
    }

    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if form.trimmed(field).is_none() {
            errors.push(FieldError::new(field, ValidationError::MissingField));
        }
    }

    if !form.trimmed(fields::PARENT_EMAIL).is_some_and(is_valid_email) {
        errors.push(FieldError::new(fields::PARENT_EMAIL, ValidationError::InvalidEmail));
    }

    if let Some(err) = check_age_for_section(form, today) {
        errors.push(err);
    }

    let report = ValidationReport::from_errors(errors);
    debug!(
        ok = report.is_ok(),
        flagged = ?report.flagged_fields(),
        "Validated application"
    );
    report
}

/// Age/section consistency. Skipped when either field is blank, since the
/// required-field check already reports that.
fn check_age_for_section(form: &ApplicationForm, today: NaiveDate) -> Option<FieldError> {
    let dob = form.trimmed(fields::CHILD_DOB)?;
    let section = form.trimmed(fields::PREFERRED_SECTION)?;

    let section: Section = match section.parse() {
        Ok(section) => section,
        Err(_) => {
            return Some(FieldError::new(
                fields::PREFERRED_SECTION,
                ValidationError::UnknownSection(section.to_string()),
            ))
        }
    };

    let Some(dob) = parse_date_of_birth(dob) else {
        return Some(FieldError::new(fields::CHILD_DOB, ValidationError::InvalidDate));
    };

    let age = age_on(dob, today);
    if section.accepts_age(age) {
        None
    } else {
        Some(FieldError::new(
            fields::PREFERRED_SECTION,
            ValidationError::AgeSectionMismatch { age, section },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid test date")
    }

    /// A complete application for a five-year-old squirrel
    fn valid_form() -> ApplicationForm {
        ApplicationForm::new()
            .with(fields::CHILD_NAME, "Sam Smith")
            .with(fields::CHILD_DOB, "2020-01-10")
            .with(fields::PREFERRED_SECTION, "squirrels")
            .with(fields::PARENT_NAME, "Alex Smith")
            .with(fields::PARENT_EMAIL, "alex@example.co.uk")
            .with(fields::PARENT_PHONE, "07700 900123")
            .with(fields::ADDRESS, "1 High Street, Odiham")
            .with(fields::CONSENT, "on")
    }

    #[test]
    fn test_valid_form_passes() {
        let report = validate_on(&valid_form(), today());
        assert!(report.is_ok(), "unexpected errors: {}", report);
        assert_eq!(report.focus(), None);
        assert_eq!(report.to_string(), "valid");
    }

    #[test]
    fn test_every_missing_field_is_flagged() {
        let mut form = valid_form();
        form.remove(fields::CHILD_NAME);
        form.insert(fields::ADDRESS, "   ");
        form.remove(fields::CONSENT);

        let report = validate_on(&form, today());
        assert!(!report.is_ok());
        assert!(report.contains(fields::CHILD_NAME, &ValidationError::MissingField));
        assert!(report.contains(fields::ADDRESS, &ValidationError::MissingField));
        assert!(report.contains(fields::CONSENT, &ValidationError::MissingField));
        assert_eq!(report.errors().len(), 3);
        // Focus goes to the first field in form order
        assert_eq!(report.focus(), Some(fields::CHILD_NAME));
    }

    #[test]
    fn test_empty_form_flags_all_required_fields() {
        let report = validate_on(&ApplicationForm::new(), today());
        for field in REQUIRED_FIELDS {
            assert!(report.contains(field, &ValidationError::MissingField), "{}", field);
        }
        assert!(report.contains(fields::PARENT_EMAIL, &ValidationError::InvalidEmail));
        assert_eq!(report.flagged_fields(), REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["alex", "alex@example", "@example.com", "alex@.", "al ex@example.com", "a@b@c.d"] {
            let form = valid_form().with(fields::PARENT_EMAIL, email);
            let report = validate_on(&form, today());
            assert_eq!(
                report.errors_for(fields::PARENT_EMAIL).collect::<Vec<_>>(),
                vec![&ValidationError::InvalidEmail],
                "{}",
                email
            );
        }
    }

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.c", "alex.smith+scouts@mail.example.org", " alex@example.com "] {
            assert!(validate_on(&valid_form().with(fields::PARENT_EMAIL, email), today()).is_ok());
        }
    }

    #[test]
    fn test_age_five_in_beavers_is_a_mismatch() {
        let form = valid_form().with(fields::PREFERRED_SECTION, "beavers");
        let report = validate_on(&form, today());
        let expected = ValidationError::AgeSectionMismatch {
            age: 5,
            section: Section::Beavers,
        };
        assert!(report.contains(fields::PREFERRED_SECTION, &expected));
        assert!(report.alert().expect("blocking alert").contains("(5 years)"));
    }

    #[test]
    fn test_age_five_in_squirrels_passes() {
        let report = validate_on(&valid_form(), today());
        assert_eq!(report.errors_for(fields::PREFERRED_SECTION).count(), 0);
    }

    #[test]
    fn test_unknown_section_and_bad_date() {
        let form = valid_form().with(fields::PREFERRED_SECTION, "explorers");
        let report = validate_on(&form, today());
        assert!(report.contains(
            fields::PREFERRED_SECTION,
            &ValidationError::UnknownSection("explorers".to_string())
        ));

        let form = valid_form().with(fields::CHILD_DOB, "not a date");
        let report = validate_on(&form, today());
        assert!(report.contains(fields::CHILD_DOB, &ValidationError::InvalidDate));
    }

    #[test]
    fn test_script_is_rejected_before_other_checks() {
        // Missing fields would normally be reported too
        let form = ApplicationForm::new().with(fields::CHILD_NAME, "<script>alert(1)</script>");
        let report = validate_on(&form, today());
        assert_eq!(
            report.errors(),
            &[FieldError::new(fields::CHILD_NAME, ValidationError::ContentRejected)]
        );
        assert!(report.is_content_rejected());
        assert_eq!(
            report.alert().as_deref(),
            Some("Invalid characters detected in form submission.")
        );
    }

    #[test]
    fn test_summary_keeps_first_reason_per_field() {
        let mut form = valid_form();
        form.remove(fields::PARENT_EMAIL);
        let summary = validate_on(&form, today()).summary();
        assert!(!summary.ok);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[fields::PARENT_EMAIL], "missing_field");

        let json = serde_json::to_string(&summary).expect("serialize");
        assert_eq!(json, r#"{"ok":false,"errors":{"parent-email":"missing_field"}}"#);
    }

    #[test]
    fn test_validate_is_repeatable() {
        let form = valid_form().with(fields::PREFERRED_SECTION, "cubs");
        assert_eq!(validate_on(&form, today()), validate_on(&form, today()));
    }
}
