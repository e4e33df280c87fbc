//! Database schema and migrations for Podium.
//!
//! Migrations are applied in order when the database is opened. The
//! schema_version table tracks which ones have run. All timestamps are unix
//! seconds.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    r#"
CREATE TABLE podium_user (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    email                 TEXT NOT NULL UNIQUE,
    password_hash         TEXT NOT NULL,
    password_reset_token  TEXT UNIQUE,
    activation_token      TEXT UNIQUE,
    auth_key              TEXT NOT NULL,
    status                INTEGER NOT NULL DEFAULT 1,  -- 1 registered, 9 banned, 10 active
    created_at            INTEGER NOT NULL,
    updated_at            INTEGER NOT NULL
);

CREATE INDEX idx_podium_user_status ON podium_user(status);
"#,
    // v2: categories, forums and moderators
    r#"
CREATE TABLE podium_category (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL,
    visible     INTEGER NOT NULL DEFAULT 1,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
);

CREATE TABLE podium_forum (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id  INTEGER NOT NULL REFERENCES podium_category(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    slug         TEXT NOT NULL,
    visible      INTEGER NOT NULL DEFAULT 1,
    locked       INTEGER NOT NULL DEFAULT 0,
    created_at   INTEGER NOT NULL,
    updated_at   INTEGER NOT NULL
);

CREATE INDEX idx_podium_forum_category_id ON podium_forum(category_id);

CREATE TABLE podium_moderator (
    forum_id  INTEGER NOT NULL REFERENCES podium_forum(id) ON DELETE CASCADE,
    user_id   INTEGER NOT NULL REFERENCES podium_user(id) ON DELETE CASCADE,
    PRIMARY KEY (forum_id, user_id)
);
"#,
    // v3: threads, posts and per-viewer thread views
    r#"
CREATE TABLE podium_thread (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    slug         TEXT NOT NULL,
    category_id  INTEGER NOT NULL REFERENCES podium_category(id) ON DELETE CASCADE,
    forum_id     INTEGER NOT NULL REFERENCES podium_forum(id) ON DELETE CASCADE,
    author_id    INTEGER NOT NULL REFERENCES podium_user(id),
    pinned       INTEGER NOT NULL DEFAULT 0,
    updated_at   INTEGER NOT NULL,
    created_at   INTEGER NOT NULL
);

CREATE INDEX idx_podium_thread_forum_id ON podium_thread(forum_id);
CREATE INDEX idx_podium_thread_author_id ON podium_thread(author_id);
CREATE INDEX idx_podium_thread_updated_at ON podium_thread(updated_at);

CREATE TABLE podium_post (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    thread_id   INTEGER NOT NULL REFERENCES podium_thread(id) ON DELETE CASCADE,
    author_id   INTEGER NOT NULL REFERENCES podium_user(id),
    content     TEXT NOT NULL,
    edited_at   INTEGER,                 -- NULL until the post is edited
    created_at  INTEGER NOT NULL
);

CREATE INDEX idx_podium_post_thread_id ON podium_post(thread_id);

CREATE TABLE podium_thread_view (
    user_id           INTEGER NOT NULL REFERENCES podium_user(id) ON DELETE CASCADE,
    thread_id         INTEGER NOT NULL REFERENCES podium_thread(id) ON DELETE CASCADE,
    new_last_seen     INTEGER NOT NULL,
    edited_last_seen  INTEGER NOT NULL,
    PRIMARY KEY (user_id, thread_id)
);
"#,
];
