use serde::{Deserialize, Serialize};

use crate::models::{fields, Section, REQUIRED_FIELDS};

use super::is_valid_email;

/// Visual state of a single input while the form is being filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum FieldIndicator {
    #[default]
    Neutral,
    Valid,
    Invalid,
}

impl FieldIndicator {
    /// Typing into a flagged field clears the flag until the next check
    pub fn on_input(self) -> Self {
        match self {
            FieldIndicator::Invalid => FieldIndicator::Neutral,
            other => other,
        }
    }

    /// Indicator for the section selector after a date-of-birth change
    pub fn for_recommendation(recommended: Option<Section>) -> Self {
        match recommended {
            Some(_) => FieldIndicator::Valid,
            None => FieldIndicator::Neutral,
        }
    }
}

/// Check one field when it loses focus.
///
/// Blank required fields are flagged. The parent email is additionally
/// marked valid or invalid once something has been typed into it.
pub fn check_field(name: &str, value: &str) -> FieldIndicator {
    let value = value.trim();

    if value.is_empty() {
        return if REQUIRED_FIELDS.iter().any(|f| *f == name) {
            FieldIndicator::Invalid
        } else {
            FieldIndicator::Neutral
        };
    }

    if name == fields::PARENT_EMAIL {
        return if is_valid_email(value) {
            FieldIndicator::Valid
        } else {
            FieldIndicator::Invalid
        };
    }

    FieldIndicator::Neutral
}
