//! Account module for Podium.
//!
//! This module provides user accounts and their credential lifecycle:
//! - Password hashing with Argon2 and password strength rules
//! - Time-stamped activation and password reset tokens
//! - Registration and password change forms
//! - User persistence behind the [`UserStore`] trait
//! - [`AccountService`] tying the lifecycle together

mod form;
mod password;
mod repository;
mod service;
mod store;
mod token;
mod user;

pub use form::{PasswordChangeForm, RegistrationForm};
pub use password::{
    check_password_requirements, generate_auth_key, generate_random_string, hash_password,
    verify_password, PasswordError, RANDOM_STRING_LENGTH,
};
pub use repository::UserRepository;
pub use service::AccountService;
pub use store::{UserKey, UserStore};
pub use token::{generate_token, is_token_valid_at, token_timestamp};
pub use user::{User, UserStatus};
