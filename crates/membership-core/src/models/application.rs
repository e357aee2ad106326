use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field names used by the membership form.
pub mod fields {
    pub const CHILD_NAME: &str = "child-name";
    pub const CHILD_DOB: &str = "child-dob";
    pub const PREFERRED_SECTION: &str = "preferred-section";
    pub const PARENT_NAME: &str = "parent-name";
    pub const PARENT_EMAIL: &str = "parent-email";
    pub const PARENT_PHONE: &str = "parent-phone";
    pub const ADDRESS: &str = "address";
    pub const CONSENT: &str = "consent";

    /// Hidden field carrying the form's CSRF token
    pub const CSRF_TOKEN: &str = "csrf_token";
}

/// Required fields, in the order they are checked and focused.
pub const REQUIRED_FIELDS: [&str; 8] = [
    fields::CHILD_NAME,
    fields::CHILD_DOB,
    fields::PREFERRED_SECTION,
    fields::PARENT_NAME,
    fields::PARENT_EMAIL,
    fields::PARENT_PHONE,
    fields::ADDRESS,
    fields::CONSENT,
];

/// The values of one submitted application, keyed by field name.
///
/// Serializes as a flat JSON object, which is also the shape handed to the
/// submission collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationForm {
    fields: BTreeMap<String, String>,
}

impl ApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling a form in one expression
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a field with surrounding whitespace removed, if non-blank
    pub fn trimmed(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApplicationForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for ApplicationForm {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_treats_whitespace_as_blank() {
        let form = ApplicationForm::new()
            .with(fields::CHILD_NAME, "  Sam  ")
            .with(fields::ADDRESS, "   ");
        assert_eq!(form.trimmed(fields::CHILD_NAME), Some("Sam"));
        assert_eq!(form.trimmed(fields::ADDRESS), None);
        assert_eq!(form.trimmed(fields::CONSENT), None);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let form: ApplicationForm = [(fields::PARENT_NAME, "Alex"), (fields::CONSENT, "on")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&form).expect("serialize");
        assert_eq!(json, r#"{"consent":"on","parent-name":"Alex"}"#);

        let back: ApplicationForm = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.get(fields::PARENT_NAME), Some("Alex"));
    }

    #[test]
    fn test_required_fields_order() {
        assert_eq!(REQUIRED_FIELDS[0], "child-name");
        assert_eq!(REQUIRED_FIELDS[7], "consent");
    }
}
