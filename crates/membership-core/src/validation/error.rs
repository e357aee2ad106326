use std::fmt;

use thiserror::Error;

use crate::models::Section;

/// Why a single field failed validation.
///
/// The messages are the ones shown to the person filling in the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid characters detected in form submission.")]
    ContentRejected,

    #[error("This field is required.")]
    MissingField,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("The selected section is not appropriate for the child's age ({age} years). Please select the correct section.")]
    AgeSectionMismatch { age: i32, section: Section },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Please enter a valid date of birth.")]
    InvalidDate,
}

impl ValidationError {
    /// Short machine-readable reason, used in validation summaries
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::ContentRejected => "content_rejected",
            ValidationError::MissingField => "missing_field",
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::AgeSectionMismatch { .. } => "age_section_mismatch",
            ValidationError::UnknownSection(_) => "unknown_section",
            ValidationError::InvalidDate => "invalid_date",
        }
    }

    /// Whether the page should raise a blocking alert rather than only an
    /// inline indicator
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ValidationError::ContentRejected | ValidationError::AgeSectionMismatch { .. }
        )
    }
}

/// A validation failure attached to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub error: ValidationError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: ValidationError) -> Self {
        Self {
            field: field.into(),
            error,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

impl std::error::Error for FieldError {}
