//! Thread repository for Podium.
//!
//! Threads are loaded together with their forum's lock flag and post
//! aggregates, so every returned [`Thread`] can be classified directly.

use chrono::Utc;
use sqlx::QueryBuilder;
use tracing::{debug, info};

use super::post::{NewPost, Post};
use super::post_repository::insert_post;
use super::repository::ForumRepository;
use super::status::ThreadStatus;
use super::thread::{NewThread, Thread, ThreadView};
use super::types::Viewer;
use crate::db::DbPool;
use crate::{PodiumError, Result};

const THREAD_SELECT: &str = "SELECT t.id, t.name, t.slug, t.category_id, t.forum_id, t.author_id,
        t.pinned, f.locked,
        (SELECT COUNT(*) FROM podium_post p WHERE p.thread_id = t.id) AS posts,
        (SELECT COALESCE(MAX(p.created_at), 0) FROM podium_post p WHERE p.thread_id = t.id)
            AS new_post_at,
        (SELECT COALESCE(MAX(p.edited_at), 0) FROM podium_post p WHERE p.thread_id = t.id)
            AS edited_post_at,
        t.created_at, t.updated_at
 FROM podium_thread t
 JOIN podium_forum f ON f.id = t.forum_id";

const POST_COLUMNS: &str = "id, thread_id, author_id, content, edited_at, created_at";

/// Repository for thread persistence and per-viewer thread queries.
pub struct ThreadRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Start a new thread with its opening post.
    ///
    /// Returns the created thread with the assigned ID.
    pub async fn create(&self, new_thread: &NewThread) -> Result<Thread> {
        self.create_at(new_thread, Utc::now().timestamp()).await
    }

    /// Start a new thread with an explicit creation time.
    ///
    /// The input is validated first. The thread takes its category from the
    /// forum, and the thread and opening post are written in one
    /// transaction.
    pub async fn create_at(&self, new_thread: &NewThread, now: i64) -> Result<Thread> {
        new_thread.validate()?;

        let forum = ForumRepository::new(self.pool)
            .get_by_id(new_thread.forum_id)
            .await?
            .ok_or_else(|| PodiumError::NotFound("forum".to_string()))?;

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO podium_thread (name, slug, category_id, forum_id, author_id, pinned,
                                        updated_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_thread.name.trim())
        .bind(new_thread.slug())
        .bind(forum.category_id)
        .bind(forum.id)
        .bind(new_thread.author_id)
        .bind(new_thread.pinned)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let opening = NewPost::new(id, new_thread.author_id, new_thread.post.clone());
        insert_post(&mut tx, &opening, now).await?;
        tx.commit().await?;

        info!(
            thread_id = id,
            forum_id = forum.id,
            author_id = new_thread.author_id,
            "Thread created"
        );

        self.get_by_id(id)
            .await?
            .ok_or_else(|| PodiumError::NotFound("thread".to_string()))
    }

    /// Get a thread by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Thread>> {
        let thread = sqlx::query_as::<_, Thread>(&format!("{THREAD_SELECT} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(thread)
    }

    /// List threads, optionally only those in one forum.
    ///
    /// Pinned threads come first, then the most recently updated, with ties
    /// broken by ascending ID.
    pub async fn search(&self, forum_id: Option<i64>) -> Result<Vec<Thread>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(THREAD_SELECT);
        if let Some(forum_id) = forum_id {
            query.push(" WHERE t.forum_id = ");
            query.push_bind(forum_id);
        }
        query.push(" ORDER BY t.pinned DESC, t.updated_at DESC, t.id ASC");

        let threads = query.build_query_as::<Thread>().fetch_all(self.pool).await?;
        Ok(threads)
    }

    /// List threads started by a user, most recently updated first.
    ///
    /// Guests only see threads in visible forums.
    pub async fn search_by_user(&self, user_id: i64, viewer: &Viewer) -> Result<Vec<Thread>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(THREAD_SELECT);
        query.push(" WHERE t.author_id = ");
        query.push_bind(user_id);
        if viewer.is_guest() {
            query.push(" AND f.visible = 1");
        }
        query.push(" ORDER BY t.updated_at DESC, t.id ASC");

        let threads = query.build_query_as::<Thread>().fetch_all(self.pool).await?;
        Ok(threads)
    }

    /// Get the viewer's record for a thread. Guests never have one.
    pub async fn view(&self, thread_id: i64, viewer: &Viewer) -> Result<Option<ThreadView>> {
        let Some(user_id) = viewer.user_id else {
            return Ok(None);
        };

        let view = sqlx::query_as::<_, ThreadView>(
            "SELECT user_id, thread_id, new_last_seen, edited_last_seen
             FROM podium_thread_view WHERE user_id = ? AND thread_id = ?",
        )
        .bind(user_id)
        .bind(thread_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(view)
    }

    /// Record that the viewer has seen everything in a thread up to now.
    ///
    /// Returns false for guests, for whom nothing is recorded.
    pub async fn mark_seen(&self, thread_id: i64, viewer: &Viewer) -> Result<bool> {
        self.mark_seen_at(thread_id, viewer, Utc::now().timestamp())
            .await
    }

    /// Record that the viewer has seen everything in a thread up to `now`.
    pub async fn mark_seen_at(&self, thread_id: i64, viewer: &Viewer, now: i64) -> Result<bool> {
        let Some(user_id) = viewer.user_id else {
            return Ok(false);
        };

        sqlx::query(
            "INSERT INTO podium_thread_view (user_id, thread_id, new_last_seen, edited_last_seen)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (user_id, thread_id) DO UPDATE
             SET new_last_seen = excluded.new_last_seen,
                 edited_last_seen = excluded.edited_last_seen",
        )
        .bind(user_id)
        .bind(thread_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        debug!(thread_id, user_id, seen_at = now, "Thread view recorded");
        Ok(true)
    }

    /// Classify a thread for the viewer.
    pub async fn status(
        &self,
        thread: &Thread,
        viewer: &Viewer,
        hot_minimum: i64,
    ) -> Result<ThreadStatus> {
        let view = self.view(thread.id, viewer).await?;
        Ok(ThreadStatus::classify(thread, view.as_ref(), hot_minimum))
    }

    /// The post the viewer should be taken to when opening a thread.
    ///
    /// That is the first post created since the last visit, else the first
    /// post edited since the last visit, else the latest post.
    pub async fn first_to_see(&self, thread: &Thread, viewer: &Viewer) -> Result<Option<Post>> {
        let view = self.view(thread.id, viewer).await?;
        let (new_last_seen, edited_last_seen) = view
            .map(|v| (v.new_last_seen, v.edited_last_seen))
            .unwrap_or((0, 0));

        let first_new = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM podium_post
             WHERE thread_id = ? AND created_at > ? ORDER BY id ASC LIMIT 1"
        ))
        .bind(thread.id)
        .bind(new_last_seen)
        .fetch_optional(self.pool)
        .await?;
        if first_new.is_some() {
            return Ok(first_new);
        }

        let first_edited = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM podium_post
             WHERE thread_id = ? AND edited_at > ? ORDER BY id ASC LIMIT 1"
        ))
        .bind(thread.id)
        .bind(edited_last_seen)
        .fetch_optional(self.pool)
        .await?;
        if first_edited.is_some() {
            return Ok(first_edited);
        }

        let latest = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM podium_post
             WHERE thread_id = ? ORDER BY id DESC LIMIT 1"
        ))
        .bind(thread.id)
        .fetch_optional(self.pool)
        .await?;
        Ok(latest)
    }

    /// Check if the viewer may moderate the thread.
    ///
    /// Administrators always can; other users only in forums they moderate.
    pub async fn is_moderator(&self, thread: &Thread, viewer: &Viewer) -> Result<bool> {
        if viewer.is_admin {
            return Ok(true);
        }
        let Some(user_id) = viewer.user_id else {
            return Ok(false);
        };

        let moderators = ForumRepository::new(self.pool)
            .moderators(thread.forum_id)
            .await?;
        Ok(moderators.contains(&user_id))
    }

    /// Pin or unpin a thread.
    ///
    /// Returns false if the thread does not exist.
    pub async fn set_pinned(&self, id: i64, pinned: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE podium_thread SET pinned = ? WHERE id = ?")
            .bind(pinned)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set a thread's last activity time.
    ///
    /// Returns false if the thread does not exist.
    pub async fn touch_at(&self, id: i64, now: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE podium_thread SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count threads in a forum.
    pub async fn count_by_forum(&self, forum_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podium_thread WHERE forum_id = ?")
            .bind(forum_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::forum::{NewCategory, NewForum, PostRepository, ThreadClass, ThreadIcon};
    use crate::validation::ValidationError;

    struct Fixture {
        db: Database,
        forum_id: i64,
        category_id: i64,
        user_id: i64,
    }

    async fn insert_user(db: &Database, email: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO podium_user (email, password_hash, auth_key, status,
                                      created_at, updated_at)
             VALUES (?, 'hash', 'key', 10, 0, 0) RETURNING id",
        )
        .bind(email)
        .fetch_one(db.pool())
        .await
        .unwrap()
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let forums = ForumRepository::new(db.pool());
        let category = forums.create_category(&NewCategory::new("Main")).await.unwrap();
        let forum = forums
            .create(&NewForum::new(category.id, "General"))
            .await
            .unwrap();
        let user_id = insert_user(&db, "author@example.com").await;
        Fixture {
            forum_id: forum.id,
            category_id: category.id,
            user_id,
            db,
        }
    }

    fn new_thread(fx: &Fixture, name: &str) -> NewThread {
        NewThread::new(fx.forum_id, name, fx.user_id, "Opening post content")
    }

    #[tokio::test]
    async fn test_create_thread() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());

        let thread = repo
            .create_at(&new_thread(&fx, "Hello World"), 1_000)
            .await
            .unwrap();

        assert_eq!(thread.name, "Hello World");
        assert_eq!(thread.slug, "hello-world");
        assert_eq!(thread.forum_id, fx.forum_id);
        assert_eq!(thread.category_id, fx.category_id);
        assert_eq!(thread.posts, 1);
        assert_eq!(thread.new_post_at, 1_000);
        assert_eq!(thread.edited_post_at, 0);
        assert_eq!(thread.created_at, 1_000);
        assert!(!thread.pinned);
        assert!(!thread.locked);
    }

    #[tokio::test]
    async fn test_create_thread_invalid() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());

        let err = repo
            .create(&NewThread::new(fx.forum_id, "", fx.user_id, "short"))
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("name"), &[ValidationError::Required]);
        assert!(errors.has("post"));
        assert_eq!(repo.count_by_forum(fx.forum_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_thread_unknown_forum() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());

        let err = repo
            .create(&NewThread::new(999, "Topic", fx.user_id, "Opening post content"))
            .await
            .unwrap_err();
        assert!(matches!(err, PodiumError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_locked_comes_from_forum() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let thread = repo.create(&new_thread(&fx, "Topic")).await.unwrap();

        ForumRepository::new(fx.db.pool())
            .set_locked(fx.forum_id, true)
            .await
            .unwrap();

        let thread = repo.get_by_id(thread.id).await.unwrap().unwrap();
        assert!(thread.locked);
        assert_eq!(thread.icon(None, 20), ThreadIcon::Locked);
    }

    #[tokio::test]
    async fn test_search_ordering() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());

        let old = repo.create_at(&new_thread(&fx, "Old"), 100).await.unwrap();
        let recent_a = repo.create_at(&new_thread(&fx, "Recent A"), 200).await.unwrap();
        let recent_b = repo.create_at(&new_thread(&fx, "Recent B"), 200).await.unwrap();
        let pinned = repo.create_at(&new_thread(&fx, "Pinned"), 50).await.unwrap();
        assert!(repo.set_pinned(pinned.id, true).await.unwrap());

        let ids: Vec<i64> = repo
            .search(Some(fx.forum_id))
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![pinned.id, recent_a.id, recent_b.id, old.id]);

        // Touching moves a thread ahead of unpinned ones only
        repo.touch_at(old.id, 300).await.unwrap();
        let ids: Vec<i64> = repo
            .search(None)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![pinned.id, old.id, recent_a.id, recent_b.id]);
    }

    #[tokio::test]
    async fn test_search_filters_forum() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let other = ForumRepository::new(fx.db.pool())
            .create(&NewForum::new(fx.category_id, "Other"))
            .await
            .unwrap();

        repo.create(&new_thread(&fx, "Here")).await.unwrap();
        repo.create(&NewThread::new(other.id, "There", fx.user_id, "Opening post content"))
            .await
            .unwrap();

        let here = repo.search(Some(fx.forum_id)).await.unwrap();
        assert_eq!(here.len(), 1);
        assert_eq!(here[0].name, "Here");
        assert_eq!(repo.search(None).await.unwrap().len(), 2);
        assert!(repo.search(Some(999)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_user_visibility() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let hidden = ForumRepository::new(fx.db.pool())
            .create(&NewForum::new(fx.category_id, "Staff").visible(false))
            .await
            .unwrap();
        let other_user = insert_user(&fx.db, "other@example.com").await;

        let public = repo.create_at(&new_thread(&fx, "Public"), 100).await.unwrap();
        let secret = repo
            .create_at(
                &NewThread::new(hidden.id, "Secret", fx.user_id, "Opening post content"),
                200,
            )
            .await
            .unwrap();
        repo.create_at(
            &NewThread::new(fx.forum_id, "Not mine", other_user, "Opening post content"),
            300,
        )
        .await
        .unwrap();

        let ids: Vec<i64> = repo
            .search_by_user(fx.user_id, &Viewer::user(other_user))
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![secret.id, public.id]);

        let ids: Vec<i64> = repo
            .search_by_user(fx.user_id, &Viewer::guest())
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![public.id]);
    }

    #[tokio::test]
    async fn test_mark_seen_and_status() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let posts = PostRepository::new(fx.db.pool());
        let viewer = Viewer::user(fx.user_id);

        let thread = repo.create_at(&new_thread(&fx, "Topic"), 100).await.unwrap();
        let status = repo.status(&thread, &viewer, 20).await.unwrap();
        assert_eq!(status.icon, ThreadIcon::New);
        assert_eq!(status.class, ThreadClass::New);

        assert!(repo.mark_seen_at(thread.id, &viewer, 100).await.unwrap());
        let status = repo.status(&thread, &viewer, 20).await.unwrap();
        assert_eq!(status.icon, ThreadIcon::NoNew);
        assert_eq!(status.description, "No New Posts");

        let opening = posts.list_by_thread(thread.id).await.unwrap().remove(0);
        posts.edit_at(opening.id, "Edited opening post", 150).await.unwrap();
        let thread = repo.get_by_id(thread.id).await.unwrap().unwrap();
        let status = repo.status(&thread, &viewer, 20).await.unwrap();
        assert_eq!(status.class, ThreadClass::Edited);
        assert_eq!(status.description, "Edited Posts");

        // Upsert keeps a single row per viewer and thread
        assert!(repo.mark_seen_at(thread.id, &viewer, 200).await.unwrap());
        let view = repo.view(thread.id, &viewer).await.unwrap().unwrap();
        assert_eq!(view.new_last_seen, 200);
        assert_eq!(view.edited_last_seen, 200);
        let status = repo.status(&thread, &viewer, 20).await.unwrap();
        assert_eq!(status.class, ThreadClass::Default);
    }

    #[tokio::test]
    async fn test_guest_records_nothing() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let thread = repo.create(&new_thread(&fx, "Topic")).await.unwrap();

        assert!(!repo.mark_seen(thread.id, &Viewer::guest()).await.unwrap());
        assert!(repo.view(thread.id, &Viewer::guest()).await.unwrap().is_none());

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podium_thread_view")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0);

        let status = repo.status(&thread, &Viewer::guest(), 20).await.unwrap();
        assert_eq!(status.class, ThreadClass::New);
    }

    #[tokio::test]
    async fn test_first_to_see() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let posts = PostRepository::new(fx.db.pool());
        let viewer = Viewer::user(fx.user_id);

        let thread = repo.create_at(&new_thread(&fx, "Topic"), 100).await.unwrap();
        let first = posts.list_by_thread(thread.id).await.unwrap().remove(0);
        let second = posts
            .create_at(&NewPost::new(thread.id, fx.user_id, "Second"), 200)
            .await
            .unwrap();
        let third = posts
            .create_at(&NewPost::new(thread.id, fx.user_id, "Third"), 300)
            .await
            .unwrap();

        let to_see = repo.first_to_see(&thread, &viewer).await.unwrap().unwrap();
        assert_eq!(to_see.id, first.id);

        repo.mark_seen_at(thread.id, &viewer, 250).await.unwrap();
        let to_see = repo.first_to_see(&thread, &viewer).await.unwrap().unwrap();
        assert_eq!(to_see.id, third.id);

        repo.mark_seen_at(thread.id, &viewer, 300).await.unwrap();
        posts.edit_at(second.id, "Second, edited", 400).await.unwrap();
        let to_see = repo.first_to_see(&thread, &viewer).await.unwrap().unwrap();
        assert_eq!(to_see.id, second.id);

        repo.mark_seen_at(thread.id, &viewer, 500).await.unwrap();
        let to_see = repo.first_to_see(&thread, &viewer).await.unwrap().unwrap();
        assert_eq!(to_see.id, third.id);
    }

    #[tokio::test]
    async fn test_is_moderator() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        let thread = repo.create(&new_thread(&fx, "Topic")).await.unwrap();
        let moderator = insert_user(&fx.db, "mod@example.com").await;

        assert!(!repo.is_moderator(&thread, &Viewer::guest()).await.unwrap());
        assert!(!repo.is_moderator(&thread, &Viewer::user(moderator)).await.unwrap());
        assert!(repo.is_moderator(&thread, &Viewer::admin(fx.user_id)).await.unwrap());

        ForumRepository::new(fx.db.pool())
            .add_moderator(fx.forum_id, moderator)
            .await
            .unwrap();
        assert!(repo.is_moderator(&thread, &Viewer::user(moderator)).await.unwrap());
        assert!(!repo.is_moderator(&thread, &Viewer::user(fx.user_id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_pinned_and_touch_unknown() {
        let fx = setup().await;
        let repo = ThreadRepository::new(fx.db.pool());
        assert!(!repo.set_pinned(999, true).await.unwrap());
        assert!(!repo.touch_at(999, 1).await.unwrap());
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }
}
