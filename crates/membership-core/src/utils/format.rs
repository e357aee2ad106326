/// Format a phone number as it is typed, UK style.
///
/// Keeps only the digits, then:
/// - `44...` becomes international `+44 ...`
/// - a national `0...` number longer than five digits gets a space after
///   the area code part (`01256 123456`)
/// - anything else is returned as bare digits
pub fn format_uk_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix("44") {
        format!("+44 {}", rest)
    } else if digits.starts_with('0') && digits.len() > 5 {
        format!("{} {}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}
