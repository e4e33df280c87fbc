//! Time-boxed account tokens.
//!
//! Activation and password reset tokens share the text format
//! `<random>_<unix timestamp>`. The timestamp is the last `_`-separated
//! segment; a token without a parsable trailing integer is treated as
//! invalid.

use super::password::{generate_random_string, RANDOM_STRING_LENGTH};

/// Generate a token stamped with the given unix time.
pub fn generate_token(now: i64) -> String {
    format!("{}_{}", generate_random_string(RANDOM_STRING_LENGTH), now)
}

/// Extract the issue timestamp of a token.
///
/// Returns `None` when there is no `_` separator or the trailing segment is
/// not an integer.
///
/// # Examples
///
/// ```
/// use podium::account::token_timestamp;
///
/// assert_eq!(token_timestamp("abc_def_1700000000"), Some(1_700_000_000));
/// assert_eq!(token_timestamp("abcnotanumber"), None);
/// ```
pub fn token_timestamp(token: &str) -> Option<i64> {
    let (_, timestamp) = token.rsplit_once('_')?;
    timestamp.parse().ok()
}

/// Check whether a token is still valid at `now`.
///
/// A token is invalid when it is empty, malformed, or when its timestamp
/// plus `expire_secs` lies before `now`.
pub fn is_token_valid_at(token: &str, expire_secs: i64, now: i64) -> bool {
    if token.is_empty() {
        return false;
    }
    match token_timestamp(token) {
        Some(issued) => issued.saturating_add(expire_secs) >= now,
        None => false,
    }
}
