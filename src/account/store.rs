//! Persistence interface for user accounts.
//!
//! Account logic only talks to storage through [`UserStore`], so it can be
//! exercised against any backend.

use super::user::{User, UserStatus};
use crate::Result;

/// Unique key a user can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKey<'a> {
    /// Primary key.
    Id(i64),
    /// Email address.
    Email(&'a str),
    /// Outstanding activation token.
    ActivationToken(&'a str),
    /// Outstanding password reset token.
    PasswordResetToken(&'a str),
}

/// Storage operations for user accounts.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Find a user by key, optionally restricted to a status.
    async fn find_by(&self, key: UserKey<'_>, status: Option<UserStatus>) -> Result<Option<User>>;

    /// Insert or update a user.
    ///
    /// New users get an ID and both timestamps; existing users get a fresh
    /// `updated_at`. Fails with a validation error on `email` when the
    /// address belongs to another account.
    async fn save(&self, user: &mut User) -> Result<()>;

    /// Load a user by ID regardless of status.
    async fn load(&self, id: i64) -> Result<Option<User>> {
        self.find_by(UserKey::Id(id), None).await
    }
}
