use chrono::{DateTime, Datelike, NaiveDate};

/// Parse a date of birth as posted by a date input (`YYYY-MM-DD`).
/// Full RFC 3339 timestamps are accepted too; only the date part is kept.
pub fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Age in whole years on `today` for someone born on `dob`.
///
/// A birthday later in the year than `today` has not happened yet, so the
/// year difference is reduced by one. Negative for dates in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}
