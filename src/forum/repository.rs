//! Forum repository for Podium.
//!
//! This module provides persistence for categories, forums and forum
//! moderators.

use chrono::Utc;
use tracing::info;

use super::types::{Category, Forum, NewCategory, NewForum};
use crate::db::DbPool;
use crate::{PodiumError, Result};

const FORUM_COLUMNS: &str = "id, category_id, name, slug, visible, locked, created_at, updated_at";

/// Repository for categories, forums and moderators.
pub struct ForumRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ForumRepository<'a> {
    /// Create a new ForumRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new category.
    pub async fn create_category(&self, new_category: &NewCategory) -> Result<Category> {
        let now = Utc::now().timestamp();
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO podium_category (name, slug, visible, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, name, slug, visible, created_at, updated_at",
        )
        .bind(&new_category.name)
        .bind(new_category.slug())
        .bind(new_category.visible)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, visible, created_at, updated_at
             FROM podium_category WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(category)
    }

    /// Create a new forum in an existing category.
    pub async fn create(&self, new_forum: &NewForum) -> Result<Forum> {
        if self.get_category(new_forum.category_id).await?.is_none() {
            return Err(PodiumError::NotFound("category".to_string()));
        }

        let now = Utc::now().timestamp();
        let forum = sqlx::query_as::<_, Forum>(&format!(
            "INSERT INTO podium_forum (category_id, name, slug, visible, locked,
                                       created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)
             RETURNING {FORUM_COLUMNS}"
        ))
        .bind(new_forum.category_id)
        .bind(&new_forum.name)
        .bind(new_forum.slug())
        .bind(new_forum.visible)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        info!(forum_id = forum.id, name = %forum.name, "Forum created");
        Ok(forum)
    }

    /// Get a forum by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Forum>> {
        let forum = sqlx::query_as::<_, Forum>(&format!(
            "SELECT {FORUM_COLUMNS} FROM podium_forum WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(forum)
    }

    /// List forums in a category, ordered by ID.
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Forum>> {
        let forums = sqlx::query_as::<_, Forum>(&format!(
            "SELECT {FORUM_COLUMNS} FROM podium_forum WHERE category_id = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;
        Ok(forums)
    }

    /// Lock or unlock a forum.
    ///
    /// Returns false if the forum does not exist.
    pub async fn set_locked(&self, id: i64, locked: bool) -> Result<bool> {
        let result =
            sqlx::query("UPDATE podium_forum SET locked = ?, updated_at = ? WHERE id = ?")
                .bind(locked)
                .bind(Utc::now().timestamp())
                .bind(id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Show or hide a forum from guests.
    ///
    /// Returns false if the forum does not exist.
    pub async fn set_visible(&self, id: i64, visible: bool) -> Result<bool> {
        let result =
            sqlx::query("UPDATE podium_forum SET visible = ?, updated_at = ? WHERE id = ?")
                .bind(visible)
                .bind(Utc::now().timestamp())
                .bind(id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Make a user a moderator of a forum. Adding twice is a no-op.
    pub async fn add_moderator(&self, forum_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO podium_moderator (forum_id, user_id) VALUES (?, ?)")
            .bind(forum_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        info!(forum_id, user_id, "Moderator added");
        Ok(())
    }

    /// Remove a moderator. Returns false if the user was not one.
    pub async fn remove_moderator(&self, forum_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM podium_moderator WHERE forum_id = ? AND user_id = ?")
            .bind(forum_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of the moderators of a forum, ascending.
    pub async fn moderators(&self, forum_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT user_id FROM podium_moderator WHERE forum_id = ? ORDER BY user_id",
        )
        .bind(forum_id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }
}
