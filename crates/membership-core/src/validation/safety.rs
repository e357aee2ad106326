use std::sync::LazyLock;

use regex::RegexSet;

use crate::models::{ApplicationForm, REQUIRED_FIELDS};

use super::{FieldError, ValidationError};

/// Content that is never accepted in any field.
const DISALLOWED_PATTERNS: [&str; 8] = [
    r"(?i)<script",
    r"(?i)javascript:",
    r"(?i)on\w+\s*=",
    r"(?i)data:text/html",
    r"(?i)vbscript:",
    r"(?i)<iframe",
    r"(?i)<object",
    r"(?i)<embed",
];

static DISALLOWED: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(DISALLOWED_PATTERNS).expect("disallowed content patterns are valid")
});

/// Whether a single value contains disallowed content.
pub fn is_disallowed(value: &str) -> bool {
    DISALLOWED.is_match(value)
}

/// Scan the raw values of every field. The first offending field is
/// returned as a `ContentRejected` error, looking at the required fields in
/// form order first and then any other field by name.
pub fn scan(form: &ApplicationForm) -> Result<(), FieldError> {
    let required = REQUIRED_FIELDS
        .iter()
        .filter_map(|name| form.get(name).map(|value| (*name, value)));
    let others = form
        .iter()
        .filter(|(name, _)| !REQUIRED_FIELDS.iter().any(|f| f == name));

    match required.chain(others).find(|(_, value)| is_disallowed(value)) {
        Some((name, _)) => Err(FieldError::new(name, ValidationError::ContentRejected)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_pattern_is_rejected() {
        for value in [
            "<script>alert(1)</script>",
            "<SCRIPT src=x>",
            "javascript:void(0)",
            "onload=go()",
            "x onmouseover =y",
            "data:text/html;base64,AAAA",
            "VBScript:msgbox",
            "<iframe src=x>",
            "<object data=x>",
            "<embed src=x>",
        ] {
            assert!(is_disallowed(value), "{} should be disallowed", value);
        }
    }

    #[test]
    fn test_ordinary_values_pass() {
        for value in [
            "Sam Smith",
            "2017-04-09",
            "parent@example.co.uk",
            "07700 900123",
            "The Old Forge, Odiham, RG29 1AA",
            "on",
            "beavers",
        ] {
            assert!(!is_disallowed(value), "{} should be allowed", value);
        }
    }

    #[test]
    fn test_scan_reports_first_field_in_form_order() {
        let form = ApplicationForm::new()
            .with("parent-name", "<iframe>")
            .with("address", "<embed>")
            .with("child-name", "Sam");
        let err = scan(&form).expect_err("should be rejected");
        assert_eq!(err.field, "parent-name");
        assert_eq!(err.error, ValidationError::ContentRejected);
    }

    #[test]
    fn test_scan_focuses_child_name_before_address() {
        let form = ApplicationForm::new()
            .with("child-name", "<script>alert(1)</script>")
            .with("address", "javascript:void(0)");
        assert_eq!(scan(&form).expect_err("should be rejected").field, "child-name");
    }

    #[test]
    fn test_scan_reports_required_fields_before_others() {
        let form = ApplicationForm::new()
            .with("aardvark", "<object>")
            .with("consent", "onclick=x");
        assert_eq!(scan(&form).expect_err("should be rejected").field, "consent");
    }

    #[test]
    fn test_scan_checks_fields_outside_the_required_set() {
        let form = ApplicationForm::new().with("notes", "vbscript:x");
        assert!(scan(&form).is_err());
        assert!(scan(&ApplicationForm::new()).is_ok());
    }
}
