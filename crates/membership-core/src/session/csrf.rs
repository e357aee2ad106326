use chrono::Utc;
use rand::Rng;

const TOKEN_PREFIX: &str = "csrf_";

/// Number of random base-36 characters after the prefix
const RANDOM_CHARS: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate a token for a form instance: `csrf_`, nine random base-36
/// characters, then the current time in milliseconds in base 36.
pub fn generate_csrf_token() -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_CHARS)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    format!("{}{}{}", TOKEN_PREFIX, random, to_base36(millis))
}

/// Check that a value has the shape of a generated token.
pub fn is_csrf_token(value: &str) -> bool {
    value
        .strip_prefix(TOKEN_PREFIX)
        .filter(|rest| rest.len() > RANDOM_CHARS)
        .is_some_and(|rest| rest.bytes().all(|b| BASE36.contains(&b)))
}
