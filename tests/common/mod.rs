//! Test helpers for integration tests.
//!
//! Provides database setup and helpers for creating accounts and forums.

#![allow(dead_code)]

use podium::forum::NewCategory;
use podium::{
    AccountConfig, AccountService, Database, Forum, ForumRepository, NewForum, RegistrationForm,
    User, UserRepository,
};

/// Password accepted by the strength rules.
pub const TEST_PASSWORD: &str = "Abcdef1";

/// Open a migrated in-memory database.
pub async fn setup_db() -> Database {
    Database::open_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Account service backed by the SQLite user repository.
pub fn account_service(db: &Database) -> AccountService<UserRepository<'_>> {
    AccountService::new(UserRepository::new(db.pool()), AccountConfig::default())
}

/// Register a user with [`TEST_PASSWORD`] and leave it Registered.
pub async fn register_user(db: &Database, email: &str) -> User {
    account_service(db)
        .register(&RegistrationForm::new(email, TEST_PASSWORD))
        .await
        .expect("Failed to register user")
}

/// Register and activate a user.
pub async fn create_active_user(db: &Database, email: &str) -> User {
    let mut user = register_user(db, email).await;
    let activated = account_service(db)
        .activate(&mut user)
        .await
        .expect("Failed to activate user");
    assert!(activated);
    user
}

/// Create a forum in a fresh category.
pub async fn create_forum(db: &Database, name: &str, visible: bool) -> Forum {
    let repo = ForumRepository::new(db.pool());
    let category = repo
        .create_category(&NewCategory::new(format!("{name} category")))
        .await
        .expect("Failed to create category");
    repo.create(&NewForum::new(category.id, name).visible(visible))
        .await
        .expect("Failed to create forum")
}
