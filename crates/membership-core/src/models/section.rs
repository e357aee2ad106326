use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::age_on;

/// Age-banded section a child can join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Section {
    Squirrels,
    Beavers,
    Cubs,
    Scouts,
}

/// Whether the upper end of an `AgeRange` is part of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    Inclusive,
    Exclusive,
}

/// Ages (in years) a section accepts. The lower end is always inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
    pub upper: UpperBound,
}

impl AgeRange {
    pub const fn new(min: f64, max: f64, upper: UpperBound) -> Self {
        Self { min, max, upper }
    }

    pub fn contains(&self, age: f64) -> bool {
        if age < self.min {
            return false;
        }
        match self.upper {
            UpperBound::Inclusive => age <= self.max,
            UpperBound::Exclusive => age < self.max,
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = match self.upper {
            UpperBound::Inclusive => ']',
            UpperBound::Exclusive => ')',
        };
        write!(f, "[{}, {}{}", self.min, self.max, close)
    }
}

// Adjacent sections share a boundary: it belongs to the older section,
// except the top of scouts which is the last accepted age.
const SQUIRRELS_AGES: AgeRange = AgeRange::new(4.0, 6.0, UpperBound::Exclusive);
const BEAVERS_AGES: AgeRange = AgeRange::new(6.0, 8.0, UpperBound::Exclusive);
const CUBS_AGES: AgeRange = AgeRange::new(8.0, 10.5, UpperBound::Exclusive);
const SCOUTS_AGES: AgeRange = AgeRange::new(10.5, 14.0, UpperBound::Inclusive);

impl Section {
    /// All sections, youngest first
    pub const ALL: [Section; 4] = [
        Section::Squirrels,
        Section::Beavers,
        Section::Cubs,
        Section::Scouts,
    ];

    /// Selector value, as posted by the form
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Squirrels => "squirrels",
            Section::Beavers => "beavers",
            Section::Cubs => "cubs",
            Section::Scouts => "scouts",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Section::Squirrels => "Squirrels",
            Section::Beavers => "Beavers",
            Section::Cubs => "Cubs",
            Section::Scouts => "Scouts",
        }
    }

    pub fn age_range(&self) -> AgeRange {
        match self {
            Section::Squirrels => SQUIRRELS_AGES,
            Section::Beavers => BEAVERS_AGES,
            Section::Cubs => CUBS_AGES,
            Section::Scouts => SCOUTS_AGES,
        }
    }

    pub fn accepts_age(&self, age: i32) -> bool {
        self.age_range().contains(f64::from(age))
    }

    /// Section whose range contains `age`, if any
    pub fn for_age(age: i32) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.accepts_age(age))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownSection(value.to_string()))
    }
}

/// Recommend a section for a child born on `dob`, as of today.
pub fn recommend_section(dob: NaiveDate) -> Option<Section> {
    recommend_section_on(dob, Local::now().date_naive())
}

/// Recommend a section for a child born on `dob`, as of `today`.
pub fn recommend_section_on(dob: NaiveDate, today: NaiveDate) -> Option<Section> {
    Section::for_age(age_on(dob, today))
}
