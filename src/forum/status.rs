//! Viewer-relative thread state.
//!
//! A thread's icon, CSS class and description depend on its own flags and
//! on what the current viewer has already seen. Classification is a pure
//! function of the thread, the viewer's [`ThreadView`] and the hot
//! threshold.

use std::fmt;

use super::thread::{Thread, ThreadView};

const DESC_EDITED: &str = "Edited Posts";
const DESC_HOT: &str = "Hot Thread";
const DESC_NEW: &str = "New Posts";
const DESC_NO_NEW: &str = "No New Posts";
const DESC_LOCKED: &str = "Locked Thread";
const DESC_PINNED: &str = "Pinned Thread";

/// Icon shown next to a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadIcon {
    /// The thread's forum is locked.
    Locked,
    /// The thread is pinned.
    Pinned,
    /// The thread has at least the hot minimum of posts.
    Hot,
    /// Unflagged thread with unseen activity.
    New,
    /// Unflagged thread with nothing unseen.
    NoNew,
}

impl ThreadIcon {
    /// Icon name in the glyph set.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadIcon::Locked => "lock",
            ThreadIcon::Pinned => "pushpin",
            ThreadIcon::Hot => "fire",
            ThreadIcon::New => "leaf",
            ThreadIcon::NoNew => "comment",
        }
    }
}

impl fmt::Display for ThreadIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual class of a thread row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThreadClass {
    /// Nothing unseen.
    #[default]
    Default,
    /// New posts since the last visit.
    New,
    /// Edited posts since the last visit.
    Edited,
}

impl ThreadClass {
    /// Short tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadClass::Default => "default",
            ThreadClass::New => "new",
            ThreadClass::Edited => "edited",
        }
    }

    /// Bootstrap contextual class name.
    pub fn css_class(&self) -> &'static str {
        match self {
            ThreadClass::Default => "default",
            ThreadClass::New => "success",
            ThreadClass::Edited => "warning",
        }
    }
}

impl fmt::Display for ThreadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread flag, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Locked,
    Pinned,
    Hot,
}

impl Flag {
    fn of(thread: &Thread, hot_minimum: i64) -> Option<Self> {
        if thread.locked {
            Some(Flag::Locked)
        } else if thread.pinned {
            Some(Flag::Pinned)
        } else if thread.posts >= hot_minimum {
            Some(Flag::Hot)
        } else {
            None
        }
    }

    fn icon(self) -> ThreadIcon {
        match self {
            Flag::Locked => ThreadIcon::Locked,
            Flag::Pinned => ThreadIcon::Pinned,
            Flag::Hot => ThreadIcon::Hot,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Flag::Locked => DESC_LOCKED,
            Flag::Pinned => DESC_PINNED,
            Flag::Hot => DESC_HOT,
        }
    }
}

/// Classified state of a thread for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadStatus {
    /// Icon to show.
    pub icon: ThreadIcon,
    /// Row class.
    pub class: ThreadClass,
    /// Human readable description.
    pub description: String,
}

impl ThreadStatus {
    /// Classify a thread.
    ///
    /// `view` is the viewer's record for this thread; `None` means the
    /// thread has never been seen. New activity wins over edits.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::forum::{Thread, ThreadIcon, ThreadStatus};
    ///
    /// let thread = Thread {
    ///     id: 1,
    ///     name: "Welcome".into(),
    ///     slug: "welcome".into(),
    ///     category_id: 1,
    ///     forum_id: 1,
    ///     author_id: 1,
    ///     pinned: true,
    ///     locked: false,
    ///     posts: 1,
    ///     new_post_at: 100,
    ///     edited_post_at: 0,
    ///     created_at: 100,
    ///     updated_at: 100,
    /// };
    ///
    /// let status = ThreadStatus::classify(&thread, None, 20);
    /// assert_eq!(status.icon, ThreadIcon::Pinned);
    /// assert_eq!(status.description, "Pinned Thread (New Posts)");
    /// ```
    pub fn classify(thread: &Thread, view: Option<&ThreadView>, hot_minimum: i64) -> Self {
        let flag = Flag::of(thread, hot_minimum);
        let class = unseen_class(thread, view);

        let icon = match (flag, class) {
            (Some(flag), _) => flag.icon(),
            (None, ThreadClass::Default) => ThreadIcon::NoNew,
            (None, _) => ThreadIcon::New,
        };

        let unseen = match class {
            ThreadClass::Default => None,
            ThreadClass::New => Some(DESC_NEW),
            ThreadClass::Edited => Some(DESC_EDITED),
        };
        let description = match (flag, unseen) {
            (Some(flag), Some(unseen)) => format!("{} ({})", flag.description(), unseen),
            (Some(flag), None) => flag.description().to_string(),
            (None, Some(unseen)) => unseen.to_string(),
            (None, None) => DESC_NO_NEW.to_string(),
        };

        Self {
            icon,
            class,
            description,
        }
    }
}

fn unseen_class(thread: &Thread, view: Option<&ThreadView>) -> ThreadClass {
    match view {
        None => ThreadClass::New,
        Some(view) if thread.new_post_at > view.new_last_seen => ThreadClass::New,
        Some(view) if thread.edited_post_at > view.edited_last_seen => ThreadClass::Edited,
        Some(_) => ThreadClass::Default,
    }
}

impl Thread {
    /// Icon for this thread as seen through `view`.
    pub fn icon(&self, view: Option<&ThreadView>, hot_minimum: i64) -> ThreadIcon {
        ThreadStatus::classify(self, view, hot_minimum).icon
    }

    /// Row class for this thread as seen through `view`.
    pub fn class(&self, view: Option<&ThreadView>) -> ThreadClass {
        unseen_class(self, view)
    }

    /// Description for this thread as seen through `view`.
    pub fn description(&self, view: Option<&ThreadView>, hot_minimum: i64) -> String {
        ThreadStatus::classify(self, view, hot_minimum).description
    }
}
