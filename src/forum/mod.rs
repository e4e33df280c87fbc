//! Forum module for Podium.
//!
//! This module provides the discussion side of the forum:
//! - Categories, forums and moderators
//! - Threads with their opening post, and replies
//! - Thread listings ordered for display
//! - Per-viewer seen markers and the thread state derived from them

mod post;
mod post_repository;
mod repository;
mod status;
mod thread;
mod thread_repository;
mod types;

pub use post::{NewPost, Post};
pub use post_repository::PostRepository;
pub use repository::ForumRepository;
pub use status::{ThreadClass, ThreadIcon, ThreadStatus};
pub use thread::{is_valid_thread_name, slugify, NewThread, Thread, ThreadView};
pub use thread_repository::ThreadRepository;
pub use types::{Category, Forum, NewCategory, NewForum, Viewer};
