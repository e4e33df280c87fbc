//! Account credential lifecycle.
//!
//! Registration, activation, password changes and resets, and the identity
//! lookups that depend on account status and token validity.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::form::{PasswordChangeForm, RegistrationForm};
use super::password::{generate_auth_key, hash_password, verify_password};
use super::store::{UserKey, UserStore};
use super::token::{generate_token, is_token_valid_at};
use super::user::{User, UserStatus};
use crate::config::AccountConfig;
use crate::{PodiumError, Result};

/// Account operations over a [`UserStore`].
pub struct AccountService<S> {
    store: S,
    config: AccountConfig,
}

impl<S: UserStore> AccountService<S> {
    /// Create a service with the given store and token settings.
    pub fn new(store: S, config: AccountConfig) -> Self {
        Self { store, config }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new account.
    ///
    /// The password is hashed, a fresh activation token and auth key are
    /// generated, and the user is saved as Registered. Form problems and a
    /// duplicate email are reported as [`PodiumError::Validation`].
    pub async fn register(&self, form: &RegistrationForm) -> Result<User> {
        form.validate()?;

        let mut user = User::new(form.email.as_str());
        user.password_hash = hash_password(&form.password)?;
        user.activation_token = Some(generate_token(now()));
        user.auth_key = generate_auth_key();
        user.status = UserStatus::Registered;

        self.store.save(&mut user).await?;

        info!(user_id = ?user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Activate a registered account.
    ///
    /// Returns `false` without touching the user unless the status is
    /// Registered. On success the activation token is cleared.
    pub async fn activate(&self, user: &mut User) -> Result<bool> {
        if user.status != UserStatus::Registered {
            debug!(user_id = ?user.id, status = %user.status, "Activation refused");
            return Ok(false);
        }

        let mut activated = user.clone();
        activated.activation_token = None;
        activated.status = UserStatus::Active;
        self.store.save(&mut activated).await?;
        *user = activated;

        info!(user_id = ?user.id, "User activated");
        Ok(true)
    }

    /// Activate the account holding a valid activation token.
    ///
    /// Returns `None` when the token is invalid, expired or unknown.
    pub async fn activate_by_token(&self, token: &str) -> Result<Option<User>> {
        let Some(mut user) = self.find_by_activation_token(token).await? else {
            return Ok(None);
        };
        if self.activate(&mut user).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Change the password of an account.
    ///
    /// Rotates the auth key and clears any outstanding reset token.
    pub async fn change_password(&self, user: &mut User, form: &PasswordChangeForm) -> Result<()> {
        form.validate()?;

        let mut changed = user.clone();
        changed.password_hash = hash_password(&form.password)?;
        changed.auth_key = generate_auth_key();
        changed.password_reset_token = None;
        self.store.save(&mut changed).await?;
        *user = changed;

        info!(user_id = ?user.id, "Password changed");
        Ok(())
    }

    /// Replace the activation token of a registered user.
    ///
    /// Returns `None` without touching the user unless the status is
    /// Registered.
    pub async fn issue_activation_token(&self, user: &mut User) -> Result<Option<String>> {
        if user.status != UserStatus::Registered {
            return Ok(None);
        }

        let token = generate_token(now());
        let mut updated = user.clone();
        updated.activation_token = Some(token.clone());
        self.store.save(&mut updated).await?;
        *user = updated;

        info!(user_id = ?user.id, "Activation token issued");
        Ok(Some(token))
    }

    /// Issue and save a new password reset token for the user.
    pub async fn issue_password_reset_token(&self, user: &mut User) -> Result<String> {
        let token = generate_token(now());
        let mut updated = user.clone();
        updated.password_reset_token = Some(token.clone());
        self.store.save(&mut updated).await?;
        *user = updated;

        info!(user_id = ?user.id, "Password reset token issued");
        Ok(token)
    }

    /// Set a new password using a reset token.
    ///
    /// Returns `None` when the token is invalid, expired or does not belong
    /// to an active account.
    pub async fn reset_password(
        &self,
        token: &str,
        form: &PasswordChangeForm,
    ) -> Result<Option<User>> {
        let Some(mut user) = self
            .find_by_password_reset_token(token, Some(UserStatus::Active))
            .await?
        else {
            warn!("Password reset with invalid token");
            return Ok(None);
        };

        self.change_password(&mut user, form).await?;
        Ok(Some(user))
    }

    /// Ban an account.
    ///
    /// Returns `false` if the account is already banned.
    pub async fn ban(&self, user: &mut User) -> Result<bool> {
        if user.status == UserStatus::Banned {
            return Ok(false);
        }

        let mut banned = user.clone();
        banned.status = UserStatus::Banned;
        self.store.save(&mut banned).await?;
        *user = banned;

        info!(user_id = ?user.id, "User banned");
        Ok(true)
    }

    /// Check whether an activation token has not expired.
    pub fn is_activation_token_valid(&self, token: &str) -> bool {
        is_token_valid_at(token, self.config.activation_token_expire_secs, now())
    }

    /// Check whether a password reset token has not expired.
    pub fn is_password_reset_token_valid(&self, token: &str) -> bool {
        is_token_valid_at(token, self.config.password_reset_token_expire_secs, now())
    }

    /// Find an active user by ID.
    pub async fn find_identity(&self, id: i64) -> Result<Option<User>> {
        self.store
            .find_by(UserKey::Id(id), Some(UserStatus::Active))
            .await
    }

    /// Identity lookup by access token is not offered.
    pub async fn find_identity_by_access_token(&self, _token: &str) -> Result<Option<User>> {
        Err(PodiumError::NotSupported(
            "finding an identity by access token".to_string(),
        ))
    }

    /// Find an active user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store
            .find_by(UserKey::Email(email), Some(UserStatus::Active))
            .await
    }

    /// Find a user by a valid password reset token.
    ///
    /// `status` restricts the match; `None` matches any status.
    pub async fn find_by_password_reset_token(
        &self,
        token: &str,
        status: Option<UserStatus>,
    ) -> Result<Option<User>> {
        if !self.is_password_reset_token_valid(token) {
            return Ok(None);
        }
        self.store
            .find_by(UserKey::PasswordResetToken(token), status)
            .await
    }

    /// Find a registered user by a valid activation token.
    pub async fn find_by_activation_token(&self, token: &str) -> Result<Option<User>> {
        if !self.is_activation_token_valid(token) {
            return Ok(None);
        }
        self.store
            .find_by(UserKey::ActivationToken(token), Some(UserStatus::Registered))
            .await
    }

    /// Check a plaintext password against the user's hash.
    pub fn validate_password(&self, user: &User, password: &str) -> bool {
        verify_password(password, &user.password_hash).is_ok()
    }

    /// Check a "remember me" key against the user's auth key.
    pub fn validate_auth_key(&self, user: &User, auth_key: &str) -> bool {
        !user.auth_key.is_empty() && user.auth_key == auth_key
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
