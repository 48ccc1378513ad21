//! Database module: models, schema and SQLite storage for users.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the public user shape
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool construction and `UserStorage`

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbUser, NewUser, PublicUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, UserStorage, connect};
