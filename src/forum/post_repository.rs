//! Post repository for Podium.
//!
//! Creating a post also bumps its thread's `updated_at`, so thread listings
//! ordered by activity stay current.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use super::post::{NewPost, Post};
use crate::db::DbPool;
use crate::{PodiumError, Result};

const POST_COLUMNS: &str = "id, thread_id, author_id, content, edited_at, created_at";

/// Insert a post and touch its thread on an open connection.
pub(super) async fn insert_post(
    conn: &mut SqliteConnection,
    new_post: &NewPost,
    now: i64,
) -> Result<Post> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "INSERT INTO podium_post (thread_id, author_id, content, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING {POST_COLUMNS}"
    ))
    .bind(new_post.thread_id)
    .bind(new_post.author_id)
    .bind(&new_post.content)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("UPDATE podium_thread SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(new_post.thread_id)
        .execute(&mut *conn)
        .await?;

    Ok(post)
}

/// Repository for post persistence.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add a post to a thread.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        self.create_at(new_post, Utc::now().timestamp()).await
    }

    /// Add a post to a thread with an explicit creation time.
    pub async fn create_at(&self, new_post: &NewPost, now: i64) -> Result<Post> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podium_thread WHERE id = ?")
            .bind(new_post.thread_id)
            .fetch_one(self.pool)
            .await?;
        if exists == 0 {
            return Err(PodiumError::NotFound("thread".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let post = insert_post(&mut tx, new_post, now).await?;
        tx.commit().await?;

        info!(post_id = post.id, thread_id = post.thread_id, "Post created");
        Ok(post)
    }

    /// Replace a post's content.
    ///
    /// Returns the updated post, or None if not found.
    pub async fn edit(&self, id: i64, content: &str) -> Result<Option<Post>> {
        self.edit_at(id, content, Utc::now().timestamp()).await
    }

    /// Replace a post's content with an explicit edit time.
    pub async fn edit_at(&self, id: i64, content: &str, now: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "UPDATE podium_post SET content = ?, edited_at = ? WHERE id = ?
             RETURNING {POST_COLUMNS}"
        ))
        .bind(content)
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(ref post) = post {
            debug!(post_id = post.id, "Post edited");
        }
        Ok(post)
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM podium_post WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    /// List posts in a thread, oldest first.
    pub async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM podium_post WHERE thread_id = ? ORDER BY id ASC"
        ))
        .bind(thread_id)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// Count posts in a thread.
    pub async fn count_by_thread(&self, thread_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podium_post WHERE thread_id = ?")
            .bind(thread_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
