//! User repository for Podium.
//!
//! SQLite implementation of [`UserStore`].

use chrono::Utc;
use sqlx::QueryBuilder;

use super::store::{UserKey, UserStore};
use super::user::{User, UserStatus};
use crate::db::DbPool;
use crate::validation::{ValidationError, ValidationErrors};
use crate::{PodiumError, Result};

const USER_COLUMNS: &str = "id, email, password_hash, password_reset_token, activation_token, \
                            auth_key, status, created_at, updated_at";

/// Database row for a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    password_reset_token: Option<String>,
    activation_token: Option<String>,
    auth_key: String,
    status: i64,
    created_at: i64,
    updated_at: i64,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        let status = UserStatus::from_code(self.status).ok_or_else(|| {
            PodiumError::Database(format!("unknown user status {}", self.status))
        })?;
        Ok(User {
            id: Some(self.id),
            email: self.email,
            password_hash: self.password_hash,
            password_reset_token: self.password_reset_token,
            activation_token: self.activation_token,
            auth_key: self.auth_key,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn email_taken_error() -> PodiumError {
    let mut errors = ValidationErrors::new();
    errors.add("email", ValidationError::Taken);
    errors.into()
}

/// Report a lost race on the email unique index as a field error.
fn map_unique_email(e: sqlx::Error) -> PodiumError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() && db_err.message().contains("podium_user.email") {
            return email_taken_error();
        }
    }
    e.into()
}

/// Repository for user persistence.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Check if an email is used by an account other than `except_id`.
    pub async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM podium_user WHERE email = ? AND id IS NOT ?",
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podium_user")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, user: &mut User, now: i64) -> Result<()> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO podium_user (email, password_hash, password_reset_token, activation_token,
                                      auth_key, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_reset_token)
        .bind(&user.activation_token)
        .bind(&user.auth_key)
        .bind(user.status.code())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_email)?;

        user.id = Some(id);
        user.created_at = now;
        user.updated_at = now;
        Ok(())
    }

    async fn update(&self, id: i64, user: &mut User, now: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE podium_user
             SET email = ?, password_hash = ?, password_reset_token = ?, activation_token = ?,
                 auth_key = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_reset_token)
        .bind(&user.activation_token)
        .bind(&user.auth_key)
        .bind(user.status.code())
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(map_unique_email)?;

        if result.rows_affected() == 0 {
            return Err(PodiumError::NotFound("user".to_string()));
        }
        user.updated_at = now;
        Ok(())
    }
}

impl UserStore for UserRepository<'_> {
    async fn find_by(&self, key: UserKey<'_>, status: Option<UserStatus>) -> Result<Option<User>> {
        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM podium_user WHERE "));

        match key {
            UserKey::Id(id) => {
                query.push("id = ");
                query.push_bind(id);
            }
            UserKey::Email(email) => {
                query.push("email = ");
                query.push_bind(email.to_string());
            }
            UserKey::ActivationToken(token) => {
                query.push("activation_token = ");
                query.push_bind(token.to_string());
            }
            UserKey::PasswordResetToken(token) => {
                query.push("password_reset_token = ");
                query.push_bind(token.to_string());
            }
        }
        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status.code());
        }

        let row: Option<UserRow> = query
            .build_query_as()
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn save(&self, user: &mut User) -> Result<()> {
        if self.email_taken(&user.email, user.id).await? {
            return Err(email_taken_error());
        }

        let now = Utc::now().timestamp();
        match user.id {
            Some(id) => self.update(id, user, now).await,
            None => self.insert(user, now).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn sample_user(email: &str) -> User {
        User {
            password_hash: "hash".to_string(),
            auth_key: "key".to_string(),
            activation_token: Some(format!("{email}_token_1700000000")),
            ..User::new(email)
        }
    }

    #[tokio::test]
    async fn test_save_inserts_and_assigns_id() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let mut user = sample_user("a@example.com");
        repo.save(&mut user).await.unwrap();

        assert!(user.id.is_some());
        assert!(user.created_at > 0);
        assert_eq!(user.created_at, user.updated_at);

        let loaded = repo.load(user.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let mut user = sample_user("a@example.com");
        repo.save(&mut user).await.unwrap();

        user.status = UserStatus::Active;
        user.activation_token = None;
        repo.save(&mut user).await.unwrap();

        let loaded = repo.load(user.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.status, UserStatus::Active);
        assert!(loaded.activation_token.is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_duplicate_email() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        repo.save(&mut sample_user("a@example.com")).await.unwrap();

        let mut other = sample_user("a@example.com");
        other.activation_token = None;
        let err = repo.save(&mut other).await.unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("email"), &[ValidationError::Taken]);
        assert!(other.id.is_none());
    }

    #[tokio::test]
    async fn test_unique_index_violation_reported_as_taken() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        repo.save(&mut sample_user("a@example.com")).await.unwrap();

        // Skips the pre-check, as a concurrent writer would
        let mut other = sample_user("a@example.com");
        other.activation_token = None;
        let err = repo.insert(&mut other, 1_700_000_000).await.unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("email"),
            &[ValidationError::Taken]
        );

        let mut second = sample_user("b@example.com");
        second.activation_token = None;
        repo.save(&mut second).await.unwrap();
        second.email = "a@example.com".to_string();
        let id = second.id.unwrap();
        let err = repo.update(id, &mut second, 1_700_000_000).await.unwrap_err();
        assert!(err.validation_errors().unwrap().has("email"));
    }

    #[tokio::test]
    async fn test_other_unique_violation_stays_database_error() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        repo.save(&mut sample_user("a@example.com")).await.unwrap();

        let mut other = sample_user("b@example.com");
        other.activation_token = Some("a@example.com_token_1700000000".to_string());
        let err = repo.save(&mut other).await.unwrap_err();
        assert!(matches!(err, PodiumError::Database(_)));
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let mut user = sample_user("a@example.com");
        user.id = Some(999);
        let err = repo.save(&mut user).await.unwrap_err();
        assert!(matches!(err, PodiumError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_keys_and_status() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let mut user = sample_user("a@example.com");
        user.password_reset_token = Some("reset_1700000000".to_string());
        repo.save(&mut user).await.unwrap();
        let token = user.activation_token.clone().unwrap();

        let found = repo
            .find_by(UserKey::Email("a@example.com"), None)
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, user.id);

        let found = repo
            .find_by(UserKey::ActivationToken(&token), Some(UserStatus::Registered))
            .await
            .unwrap();
        assert!(found.is_some());

        let found = repo
            .find_by(UserKey::ActivationToken(&token), Some(UserStatus::Active))
            .await
            .unwrap();
        assert!(found.is_none());

        let found = repo
            .find_by(UserKey::PasswordResetToken("reset_1700000000"), None)
            .await
            .unwrap();
        assert!(found.is_some());

        let found = repo
            .find_by(UserKey::Email("missing@example.com"), None)
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
