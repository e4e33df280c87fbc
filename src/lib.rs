//! Podium - forum core
//!
//! Thread listing and viewer-relative thread state for a bulletin-board
//! forum, together with the account credential lifecycle, on SQLite.

pub mod account;
pub mod config;
pub mod db;
pub mod error;
pub mod forum;
pub mod logging;
pub mod validation;

pub use account::{
    check_password_requirements, hash_password, verify_password, AccountService,
    PasswordChangeForm, PasswordError, RegistrationForm, User, UserKey, UserRepository,
    UserStatus, UserStore,
};
pub use config::{AccountConfig, Config, DatabaseConfig, ForumConfig, LoggingConfig};
pub use db::{Database, DbPool};
pub use error::{PodiumError, Result};
pub use forum::{
    Category, Forum, ForumRepository, NewForum, NewPost, NewThread, Post, PostRepository, Thread,
    ThreadClass, ThreadIcon, ThreadRepository, ThreadStatus, ThreadView, Viewer,
};
pub use validation::{ValidationError, ValidationErrors};
