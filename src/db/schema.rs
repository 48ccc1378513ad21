//! SQL DDL for the `users` table.

/// Idempotent schema applied at startup.
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE (creates an index implicitly)
/// - `created_at` stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,
    salt TEXT NOT NULL,
    location TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Drops the table before recreating it; backs `POST /api/init-db`.
pub const SQLITE_RESET: &str = r#"
DROP TABLE IF EXISTS users;
"#;
