//! Utility functions for date arithmetic and input formatting.

pub mod date;
pub mod format;

pub use date::{age_on, parse_date_of_birth};
pub use format::format_uk_phone;
