//! Password hashing and credential secrets for Podium.
//!
//! Uses Argon2id for password hashing.

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand::distr::Alphanumeric;
use rand::Rng;
use rand_core::OsRng;
use regex::Regex;
use thiserror::Error;

use crate::validation::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::PodiumError;

/// Length of generated random strings (auth keys, token prefixes).
pub const RANDOM_STRING_LENGTH: usize = 32;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Password hash is invalid.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

impl From<PasswordError> for PodiumError {
    fn from(e: PasswordError) -> Self {
        PodiumError::Password(e.to_string())
    }
}

/// Create the Argon2 hasher.
///
/// Memory cost 64 MB, 3 iterations, parallelism 4.
fn create_argon2() -> Argon2<'static> {
    let params = Params::new(65536, 3, 4, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
/// Strength rules are not checked here; see [`check_password_requirements`].
///
/// # Examples
///
/// ```
/// use podium::account::hash_password;
///
/// let hash = hash_password("Abcdef1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Check the password strength rules.
///
/// The password needs an uppercase letter, a lowercase letter and a decimal
/// digit, and must be 6 to 100 characters long. Classification and length
/// are Unicode-aware.
///
/// # Examples
///
/// ```
/// use podium::account::check_password_requirements;
///
/// assert!(check_password_requirements("Abcdef1"));
/// assert!(check_password_requirements("Żółw123"));
/// assert!(!check_password_requirements("Ab1"));
/// ```
pub fn check_password_requirements(password: &str) -> bool {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return false;
    }

    password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && decimal_digit().is_match(password)
}

/// Any character of general category `Nd`.
fn decimal_digit() -> &'static Regex {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    DIGIT.get_or_init(|| Regex::new(r"\p{Nd}").expect("valid digit pattern"))
}

/// Generate a random alphanumeric string.
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a fresh "remember me" authentication key.
pub fn generate_auth_key() -> String {
    generate_random_string(RANDOM_STRING_LENGTH)
}
