use chrono::{DateTime, Utc};
use serde::Serialize;

/// A `users` row. Credential material never leaves the store layer as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
    pub salt: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Outward representation of a user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for PublicUser {
    fn from(u: DbUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            location: u.location,
            created_at: u.created_at,
        }
    }
}

/// Insert payload; `id` and `created_at` are assigned on write.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub hashed_password: String,
    pub salt: String,
    pub location: String,
}
