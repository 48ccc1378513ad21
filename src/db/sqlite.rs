use crate::db::models::{DbUser, NewUser};
use crate::db::schema::{SQLITE_INIT, SQLITE_RESET};
use crate::error::SkycastError;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool, creating the database file if needed.
///
/// In-memory databases live only as long as their connection, so those are
/// pinned to a single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, SkycastError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let mut pool_opts = SqlitePoolOptions::new();
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        pool_opts = pool_opts
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    let pool = pool_opts.connect_with(connect_opts).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SkycastError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop and recreate the `users` table inside one transaction.
    pub async fn reset_schema(&self) -> Result<(), SkycastError> {
        let mut tx = self.pool.begin().await?;
        for stmt in SQLITE_RESET.split(';').chain(SQLITE_INIT.split(';')) {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Insert a user and return the store-assigned id.
    /// A unique-key violation on `username` surfaces as `Conflict`.
    pub async fn insert(&self, user: NewUser) -> Result<i64, SkycastError> {
        let created_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, hashed_password, salt, location, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.username.clone())
        .bind(user.hashed_password)
        .bind(user.salt)
        .bind(user.location)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(SkycastError::Conflict(format!(
                    "User with username '{}' already exists",
                    user.username
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, SkycastError> {
        let row = sqlx::query(
            r#"SELECT id, username, hashed_password, salt, location, created_at
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DbUser>, SkycastError> {
        let row = sqlx::query(
            r#"SELECT id, username, hashed_password, salt, location, created_at
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, SkycastError> {
        let done = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, rows = done.rows_affected(), "delete user");
        Ok(done.rows_affected() > 0)
    }

    pub async fn update_credentials(
        &self,
        id: i64,
        hashed_password: String,
        salt: String,
    ) -> Result<bool, SkycastError> {
        let done = sqlx::query("UPDATE users SET hashed_password = ?, salt = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(salt)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn update_location(&self, id: i64, location: &str) -> Result<bool, SkycastError> {
        let done = sqlx::query("UPDATE users SET location = ? WHERE id = ?")
            .bind(location)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    fn row_to_model(row: SqliteRow) -> Result<DbUser, SkycastError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let hashed_password: String = row.try_get("hashed_password")?;
        let salt: String = row.try_get("salt")?;
        let location: String = row.try_get("location")?;
        let created_at_str: String = row.try_get("created_at")?;

        Ok(DbUser {
            id,
            username,
            hashed_password,
            salt,
            location,
            created_at: parse_timestamp(&created_at_str)?,
        })
    }
}

/// RFC3339 as written by `insert`, or SQLite's `CURRENT_TIMESTAMP` format.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, SkycastError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> UserStorage {
        let pool = connect("sqlite::memory:").await.expect("memory pool");
        let storage = UserStorage::new(pool);
        storage.init_schema().await.expect("schema");
        storage
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            hashed_password: "hash".into(),
            salt: "salt".into(),
            location: "Boston".into(),
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let s = storage().await;
        let id = s.insert(new_user("alice")).await.unwrap();
        assert!(id > 0);

        let by_name = s.find_by_username("alice").await.unwrap().expect("row");
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.location, "Boston");

        let by_id = s.get_by_id(id).await.unwrap().expect("row");
        assert_eq!(by_id, by_name);
        assert!(s.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let s = storage().await;
        s.insert(new_user("alice")).await.unwrap();
        let err = s.insert(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, SkycastError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let s = storage().await;
        let id = s.insert(new_user("alice")).await.unwrap();
        assert!(s.delete_by_id(id).await.unwrap());
        assert!(!s.delete_by_id(id).await.unwrap());
        assert!(s.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn updates_touch_only_target_row() {
        let s = storage().await;
        let a = s.insert(new_user("alice")).await.unwrap();
        let b = s.insert(new_user("bob")).await.unwrap();
        assert!(s.update_location(a, "Miami").await.unwrap());
        assert!(s.update_credentials(a, "h2".into(), "s2".into()).await.unwrap());
        assert!(!s.update_location(999, "Nowhere").await.unwrap());

        let alice = s.get_by_id(a).await.unwrap().unwrap();
        assert_eq!(alice.location, "Miami");
        assert_eq!(alice.hashed_password, "h2");
        assert_eq!(alice.salt, "s2");
        assert_eq!(s.get_by_id(b).await.unwrap().unwrap().location, "Boston");
    }

    #[tokio::test]
    async fn reset_schema_clears_rows() {
        let s = storage().await;
        s.insert(new_user("alice")).await.unwrap();
        s.reset_schema().await.unwrap();
        assert!(s.find_by_username("alice").await.unwrap().is_none());
        s.insert(new_user("alice")).await.unwrap();
    }

    #[test]
    fn parses_both_timestamp_formats() {
        assert!(parse_timestamp("2024-12-10T15:30:00+00:00").is_ok());
        assert!(parse_timestamp("2024-12-10 15:30:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
