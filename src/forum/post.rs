//! Post model for Podium.

/// Post entity representing a message in a thread.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// ID of the thread this post belongs to.
    pub thread_id: i64,
    /// ID of the user who wrote the post.
    pub author_id: i64,
    /// Post body.
    pub content: String,
    /// Last edit timestamp, `None` if never edited.
    pub edited_at: Option<i64>,
    /// Creation timestamp (unix seconds).
    pub created_at: i64,
}

impl Post {
    /// Check if the post has been edited.
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Data for creating a new post in a thread.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// ID of the thread to post in.
    pub thread_id: i64,
    /// ID of the user creating the post.
    pub author_id: i64,
    /// Post body.
    pub content: String,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(thread_id: i64, author_id: i64, content: impl Into<String>) -> Self {
        Self {
            thread_id,
            author_id,
            content: content.into(),
        }
    }
}
