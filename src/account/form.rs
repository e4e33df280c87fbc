//! Account input forms and their validation rules.

use std::sync::OnceLock;

use crate::validation::{
    is_present, is_valid_email, Rules, ValidationError, ValidationErrors, MAX_EMAIL_LENGTH,
};

use super::password::check_password_requirements;

/// Registration input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Password repeated for confirmation.
    pub password_repeat: String,
    /// Whether the terms of service were accepted.
    pub tos: bool,
}

impl RegistrationForm {
    /// Create a form with the password repeated and terms accepted.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            password_repeat: password.clone(),
            password,
            tos: true,
        }
    }

    /// Validate the form.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        static RULES: OnceLock<Rules<RegistrationForm>> = OnceLock::new();
        RULES
            .get_or_init(|| {
                Rules::new()
                    .rule("email", |f: &Self| is_present(&f.email), ValidationError::Required)
                    .rule(
                        "password",
                        |f: &Self| !f.password.is_empty(),
                        ValidationError::Required,
                    )
                    .rule(
                        "password_repeat",
                        |f: &Self| !f.password_repeat.is_empty(),
                        ValidationError::Required,
                    )
                    .rule(
                        "email",
                        |f: &Self| is_valid_email(&f.email),
                        ValidationError::InvalidEmail,
                    )
                    .rule(
                        "email",
                        |f: &Self| f.email.chars().count() <= MAX_EMAIL_LENGTH,
                        ValidationError::TooLong {
                            max: MAX_EMAIL_LENGTH,
                        },
                    )
                    .rule(
                        "password",
                        |f: &Self| check_password_requirements(&f.password),
                        ValidationError::PasswordRequirements,
                    )
                    .rule(
                        "password",
                        |f: &Self| f.password == f.password_repeat,
                        ValidationError::Mismatch,
                    )
                    .rule("tos", |f: &Self| f.tos, ValidationError::TermsNotAccepted)
            })
            .validate(self)
    }
}

/// Password change input.
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    /// New plaintext password.
    pub password: String,
    /// New password repeated for confirmation.
    pub password_repeat: String,
}

impl PasswordChangeForm {
    /// Create a form with the password repeated.
    pub fn new(password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            password_repeat: password.clone(),
            password,
        }
    }

    /// Validate the form.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        static RULES: OnceLock<Rules<PasswordChangeForm>> = OnceLock::new();
        RULES
            .get_or_init(|| {
                Rules::new()
                    .rule(
                        "password",
                        |f: &Self| !f.password.is_empty(),
                        ValidationError::Required,
                    )
                    .rule(
                        "password_repeat",
                        |f: &Self| !f.password_repeat.is_empty(),
                        ValidationError::Required,
                    )
                    .rule(
                        "password",
                        |f: &Self| check_password_requirements(&f.password),
                        ValidationError::PasswordRequirements,
                    )
                    .rule(
                        "password",
                        |f: &Self| f.password == f.password_repeat,
                        ValidationError::Mismatch,
                    )
            })
            .validate(self)
    }
}
