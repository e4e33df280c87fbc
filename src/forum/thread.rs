//! Thread model for Podium.
//!
//! This module defines the Thread struct, the per-viewer ThreadView marker
//! and the validated input for starting a thread.

use std::sync::OnceLock;

use crate::validation::{
    is_present, Rules, ValidationError, ValidationErrors, MAX_THREAD_NAME_LENGTH,
    MIN_POST_LENGTH,
};

/// Thread entity with the aggregate data needed for listing.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Thread {
    /// Unique thread ID.
    pub id: i64,
    /// Thread title.
    pub name: String,
    /// URL slug generated from the name.
    pub slug: String,
    /// ID of the category the thread's forum belongs to.
    pub category_id: i64,
    /// ID of the forum this thread belongs to.
    pub forum_id: i64,
    /// ID of the user who started the thread.
    pub author_id: i64,
    /// Whether the thread is pinned to the top of its forum.
    pub pinned: bool,
    /// Whether the thread's forum is locked.
    pub locked: bool,
    /// Number of posts in the thread.
    pub posts: i64,
    /// Creation time of the newest post (0 if none).
    pub new_post_at: i64,
    /// Latest edit time of any post (0 if none was edited).
    pub edited_post_at: i64,
    /// Thread creation timestamp (unix seconds).
    pub created_at: i64,
    /// Last activity timestamp (unix seconds).
    pub updated_at: i64,
}

/// What a user has already seen of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ThreadView {
    /// Viewing user.
    pub user_id: i64,
    /// Viewed thread.
    pub thread_id: i64,
    /// Time up to which new posts have been seen.
    pub new_last_seen: i64,
    /// Time up to which post edits have been seen.
    pub edited_last_seen: i64,
}

/// Data for starting a new thread together with its opening post.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// ID of the forum to create the thread in.
    pub forum_id: i64,
    /// Thread title.
    pub name: String,
    /// ID of the user creating the thread.
    pub author_id: i64,
    /// Content of the opening post.
    pub post: String,
    /// Whether the thread starts pinned.
    pub pinned: bool,
}

impl NewThread {
    /// Create a new unpinned thread with required fields.
    pub fn new(
        forum_id: i64,
        name: impl Into<String>,
        author_id: i64,
        post: impl Into<String>,
    ) -> Self {
        Self {
            forum_id,
            name: name.into(),
            author_id,
            post: post.into(),
            pinned: false,
        }
    }

    /// Set the pinned flag.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Slug derived from the name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Validate the thread input.
    ///
    /// The name character check only runs when nothing else failed.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        static RULES: OnceLock<Rules<NewThread>> = OnceLock::new();
        RULES
            .get_or_init(|| {
                Rules::new()
                    .rule("name", |t: &Self| is_present(&t.name), ValidationError::Required)
                    .rule("post", |t: &Self| is_present(&t.post), ValidationError::Required)
                    .rule(
                        "post",
                        |t: &Self| t.post.chars().count() >= MIN_POST_LENGTH,
                        ValidationError::TooShort {
                            min: MIN_POST_LENGTH,
                        },
                    )
                    .rule_when_clean(
                        "name",
                        |t: &Self| is_valid_thread_name(&t.name),
                        ValidationError::InvalidName,
                    )
            })
            .validate(self)
    }
}

/// Check a thread name against the allowed character set.
///
/// Letters of any script, ASCII digits, underscores and whitespace, between
/// 1 and 255 characters.
pub fn is_valid_thread_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_THREAD_NAME_LENGTH).contains(&len)
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_ascii_digit() || c == '_' || c.is_whitespace())
}

/// Build a URL slug from a display name.
///
/// Alphanumeric characters are lowercased and kept. Every run of other
/// characters becomes a single `-`, with none at either end.
///
/// # Examples
///
/// ```
/// use podium::forum::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Über  Café "), "über-café");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_thread() {
        let thread = NewThread::new(1, "Test Thread", 42, "Opening post body");
        assert_eq!(thread.forum_id, 1);
        assert_eq!(thread.name, "Test Thread");
        assert_eq!(thread.author_id, 42);
        assert!(!thread.pinned);
        assert!(thread.pinned(true).pinned);
    }

    #[test]
    fn test_validate_ok() {
        let thread = NewThread::new(1, "Rust_2024 release notes", 1, "Long enough post");
        assert!(thread.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_name() {
        let thread = NewThread::new(1, "   ", 1, "Long enough post");
        let errors = thread.validate().unwrap_err();
        assert_eq!(errors.get("name"), &[ValidationError::Required]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_post_rules() {
        let errors = NewThread::new(1, "Topic", 1, "").validate().unwrap_err();
        assert_eq!(errors.get("post"), &[ValidationError::Required]);

        let errors = NewThread::new(1, "Topic", 1, "too short").validate().unwrap_err();
        assert_eq!(
            errors.get("post"),
            &[ValidationError::TooShort {
                min: MIN_POST_LENGTH
            }]
        );
    }

    #[test]
    fn test_validate_name_charset() {
        let errors = NewThread::new(1, "Hello, world!", 1, "Long enough post")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("name"), &[ValidationError::InvalidName]);

        // Only checked once everything else is valid
        let errors = NewThread::new(1, "Hello, world!", 1, "short")
            .validate()
            .unwrap_err();
        assert!(!errors.has("name"));
        assert!(errors.has("post"));
    }

    #[test]
    fn test_is_valid_thread_name() {
        assert!(is_valid_thread_name("Zażółć gęślą jaźń"));
        assert!(is_valid_thread_name("日本語 スレッド"));
        assert!(is_valid_thread_name("under_score 123"));
        assert!(!is_valid_thread_name(""));
        assert!(!is_valid_thread_name("semi;colon"));
        assert!(!is_valid_thread_name(&"a".repeat(MAX_THREAD_NAME_LENGTH + 1)));
        assert!(is_valid_thread_name(&"a".repeat(MAX_THREAD_NAME_LENGTH)));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("--Rust -- 2024--"), "rust-2024");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Ünïcode Name"), "ünïcode-name");
    }
}
