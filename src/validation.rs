//! Field validation for Podium.
//!
//! Rules are plain predicates paired with the error they report. A rule set
//! is evaluated in insertion order and collects errors per field instead of
//! stopping at the first failure.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Minimum password length (in characters).
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length (in characters).
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// Maximum thread name length (in characters).
pub const MAX_THREAD_NAME_LENGTH: usize = 255;

/// Minimum length of the opening post of a thread.
pub const MIN_POST_LENGTH: usize = 10;

/// A single field validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is missing or blank.
    #[error("cannot be blank")]
    Required,

    /// Email format is invalid.
    #[error("is not a valid email address")]
    InvalidEmail,

    /// Value is too long.
    #[error("should contain at most {max} characters")]
    TooLong { max: usize },

    /// Value is too short.
    #[error("should contain at least {min} characters")]
    TooShort { min: usize },

    /// Value is already in use.
    #[error("has already been taken")]
    Taken,

    /// Password does not meet the strength rules.
    #[error("Password must contain uppercase and lowercase letter, digit, and be at least {MIN_PASSWORD_LENGTH} characters long.")]
    PasswordRequirements,

    /// Value does not match its repetition.
    #[error("must be repeated exactly")]
    Mismatch,

    /// Terms of service were not accepted.
    #[error("You have to read and agree on ToS.")]
    TermsNotAccepted,

    /// Thread name contains forbidden characters or is too long.
    #[error("Name must contain only letters, digits, underscores and spaces ({MAX_THREAD_NAME_LENGTH} characters max).")]
    InvalidName,
}

/// Validation errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<ValidationError>>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field.
    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.fields.entry(field).or_default().push(error);
    }

    /// Check if a field has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|e| !e.is_empty())
    }

    /// Errors recorded for a field.
    pub fn get(&self, field: &str) -> &[ValidationError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over fields and their errors.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[ValidationError])> {
        self.fields.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {error}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// When a rule is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    /// Skip when the field already has an error.
    FieldClean,
    /// Skip when anything already has an error.
    AllClean,
}

struct Rule<T> {
    field: &'static str,
    predicate: fn(&T) -> bool,
    error: ValidationError,
    guard: Guard,
}

/// Ordered validation rules for a target type.
///
/// # Examples
///
/// ```
/// use podium::validation::{Rules, ValidationError};
///
/// struct Form {
///     name: String,
/// }
///
/// let rules = Rules::new().rule("name", |f: &Form| !f.name.is_empty(), ValidationError::Required);
///
/// assert!(rules.validate(&Form { name: "x".into() }).is_ok());
/// assert!(rules.validate(&Form { name: String::new() }).is_err());
/// ```
pub struct Rules<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> Rules<T> {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that runs unless its field already failed.
    pub fn rule(
        mut self,
        field: &'static str,
        predicate: fn(&T) -> bool,
        error: ValidationError,
    ) -> Self {
        self.rules.push(Rule {
            field,
            predicate,
            error,
            guard: Guard::FieldClean,
        });
        self
    }

    /// Add a rule that only runs while no field has failed yet.
    pub fn rule_when_clean(
        mut self,
        field: &'static str,
        predicate: fn(&T) -> bool,
        error: ValidationError,
    ) -> Self {
        self.rules.push(Rule {
            field,
            predicate,
            error,
            guard: Guard::AllClean,
        });
        self
    }

    /// Evaluate every rule in order against the target.
    pub fn validate(&self, target: &T) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            let skip = match rule.guard {
                Guard::FieldClean => errors.has(rule.field),
                Guard::AllClean => !errors.is_empty(),
            };
            if skip {
                continue;
            }
            if !(rule.predicate)(target) {
                errors.add(rule.field, rule.error.clone());
            }
        }
        errors.into_result()
    }
}

/// Check that a string is not blank.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Basic email format check.
///
/// Requires a single `@`, a non-empty local part, a dotted domain without
/// empty labels, and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}
