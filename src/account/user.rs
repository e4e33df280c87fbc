//! User model for Podium.

use std::fmt;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserStatus {
    /// Registered but not yet activated.
    #[default]
    Registered,
    /// Banned by an administrator.
    Banned,
    /// Activated account.
    Active,
}

impl UserStatus {
    /// All statuses, in display order.
    pub fn all() -> [UserStatus; 3] {
        [UserStatus::Active, UserStatus::Banned, UserStatus::Registered]
    }

    /// Stored integer code.
    pub fn code(&self) -> i64 {
        match self {
            UserStatus::Registered => 1,
            UserStatus::Banned => 9,
            UserStatus::Active => 10,
        }
    }

    /// Parse a stored integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(UserStatus::Registered),
            9 => Some(UserStatus::Banned),
            10 => Some(UserStatus::Active),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Registered => "Registered",
            UserStatus::Banned => "Banned",
            UserStatus::Active => "Active",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User account record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Unique user ID, `None` until the user is saved.
    pub id: Option<i64>,
    /// Email address (unique).
    pub email: String,
    /// Password hash (Argon2).
    pub password_hash: String,
    /// Outstanding password reset token.
    pub password_reset_token: Option<String>,
    /// Outstanding activation token.
    pub activation_token: Option<String>,
    /// "Remember me" authentication key.
    pub auth_key: String,
    /// Account status.
    pub status: UserStatus,
    /// Creation timestamp (unix seconds).
    pub created_at: i64,
    /// Last update timestamp (unix seconds).
    pub updated_at: i64,
}

impl User {
    /// Create an unsaved user for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Check if the user has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the account is active.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
