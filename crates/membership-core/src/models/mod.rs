//! Data models for membership applications.
//!
//! - `ApplicationForm`: the field name → value mapping one submission carries
//! - `Section`, `AgeRange`: the age-banded sections and their age table

pub mod application;
pub mod section;

pub use application::{fields, ApplicationForm, REQUIRED_FIELDS};
pub use section::{
    recommend_section, recommend_section_on, AgeRange, Section, UnknownSection, UpperBound,
};
