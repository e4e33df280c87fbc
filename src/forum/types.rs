//! Category, forum and viewer models for Podium.

use super::thread::slugify;

/// Category grouping forums.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: i64,
    /// Category name.
    pub name: String,
    /// URL slug generated from the name.
    pub slug: String,
    /// Whether guests can see the category.
    pub visible: bool,
    /// Creation timestamp (unix seconds).
    pub created_at: i64,
    /// Last update timestamp (unix seconds).
    pub updated_at: i64,
}

/// Data for creating a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Category name.
    pub name: String,
    /// Whether guests can see the category.
    pub visible: bool,
}

impl NewCategory {
    /// Create a visible category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
        }
    }

    /// Slug derived from the name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Forum holding threads.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Forum {
    /// Unique forum ID.
    pub id: i64,
    /// ID of the category this forum belongs to.
    pub category_id: i64,
    /// Forum name.
    pub name: String,
    /// URL slug generated from the name.
    pub slug: String,
    /// Whether guests can see the forum.
    pub visible: bool,
    /// Whether threads in this forum are closed to new posts.
    pub locked: bool,
    /// Creation timestamp (unix seconds).
    pub created_at: i64,
    /// Last update timestamp (unix seconds).
    pub updated_at: i64,
}

/// Data for creating a new forum.
#[derive(Debug, Clone)]
pub struct NewForum {
    /// ID of the category to create the forum in.
    pub category_id: i64,
    /// Forum name.
    pub name: String,
    /// Whether guests can see the forum.
    pub visible: bool,
}

impl NewForum {
    /// Create a visible forum in the given category.
    pub fn new(category_id: i64, name: impl Into<String>) -> Self {
        Self {
            category_id,
            name: name.into(),
            visible: true,
        }
    }

    /// Set visibility for guests.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Slug derived from the name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// The account a request is made on behalf of.
///
/// Queries that depend on who is looking take a `Viewer` instead of reading
/// any ambient session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    /// Signed-in user ID, `None` for guests.
    pub user_id: Option<i64>,
    /// Whether the viewer has forum administrator rights.
    pub is_admin: bool,
}

impl Viewer {
    /// An unauthenticated viewer.
    pub fn guest() -> Self {
        Self::default()
    }

    /// A signed-in regular user.
    pub fn user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            is_admin: false,
        }
    }

    /// A signed-in administrator.
    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            is_admin: true,
        }
    }

    /// Check if the viewer is a guest.
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_kinds() {
        assert!(Viewer::guest().is_guest());
        assert!(!Viewer::guest().is_admin);

        let user = Viewer::user(3);
        assert_eq!(user.user_id, Some(3));
        assert!(!user.is_guest());
        assert!(!user.is_admin);

        assert!(Viewer::admin(1).is_admin);
    }

    #[test]
    fn test_new_forum_slug() {
        let forum = NewForum::new(1, "General Talk").visible(false);
        assert_eq!(forum.slug(), "general-talk");
        assert!(!forum.visible);
        assert_eq!(NewCategory::new("News & Events").slug(), "news-events");
    }
}
