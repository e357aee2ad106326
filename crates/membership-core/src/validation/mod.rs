//! Validation of submitted membership applications.
//!
//! Checks run in a fixed order and the first stage can end the pass early:
//!
//! 1. `safety::scan` rejects markup/script injection attempts outright
//! 2. required fields are checked, every missing field is reported
//! 3. the parent email is checked against `local@domain.tld`
//! 4. the child's age is checked against the chosen section
//!
//! `sanitize` cleans values before they are handed on, and `feedback`
//! provides the per-field indicator used while the form is being filled in.

pub mod error;
pub mod feedback;
pub mod safety;
pub mod sanitize;
pub mod validator;

pub use error::{FieldError, ValidationError};
pub use feedback::{check_field, FieldIndicator};
pub use sanitize::{sanitize, sanitize_form};
pub use validator::{is_valid_email, validate, validate_on, ValidationReport, ValidationSummary};
