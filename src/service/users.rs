use std::sync::Arc;

use tracing::{info, warn};

use crate::db::models::{DbUser, NewUser};
use crate::db::sqlite::UserStorage;
use crate::error::SkycastError;
use crate::service::password::CredentialHasher;

pub type UserId = i64;

/// Bridges API-level user operations to the `users` table.
#[derive(Clone)]
pub struct UserService {
    storage: UserStorage,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(storage: UserStorage, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { storage, hasher }
    }

    pub fn storage(&self) -> &UserStorage {
        &self.storage
    }

    /// Salt, hash and insert. `Conflict` when the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        location: &str,
    ) -> Result<UserId, SkycastError> {
        if self.storage.find_by_username(username).await?.is_some() {
            warn!(%username, "username already registered");
            return Err(SkycastError::Conflict(format!(
                "User with username '{username}' already exists"
            )));
        }

        let salt = self.hasher.generate_salt();
        let hashed_password = self.hasher.hash(password, &salt)?;
        let id = self
            .storage
            .insert(NewUser {
                username: username.to_string(),
                hashed_password,
                salt,
                location: location.to_string(),
            })
            .await?;

        info!(user_id = id, %username, "user created");
        Ok(id)
    }

    pub async fn delete_user(&self, user_id: UserId) -> Result<(), SkycastError> {
        if !self.storage.delete_by_id(user_id).await? {
            warn!(user_id, "delete for unknown user");
            return Err(not_found(user_id));
        }
        info!(user_id, "user deleted");
        Ok(())
    }

    /// Unknown username and wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<DbUser, SkycastError> {
        let Some(user) = self.storage.find_by_username(username).await? else {
            warn!(%username, "login for unknown username");
            return Err(invalid_credentials());
        };
        if !self
            .hasher
            .verify(password, &user.salt, &user.hashed_password)?
        {
            warn!(%username, user_id = user.id, "password mismatch");
            return Err(invalid_credentials());
        }
        Ok(user)
    }

    pub async fn get_location(&self, user_id: UserId) -> Result<String, SkycastError> {
        self.storage
            .get_by_id(user_id)
            .await?
            .map(|u| u.location)
            .ok_or_else(|| not_found(user_id))
    }

    /// Verify `old_password`, then store a fresh salt and hash.
    pub async fn update_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<UserId, SkycastError> {
        let user = self.verify_credentials(username, old_password).await?;
        let salt = self.hasher.generate_salt();
        let hashed_password = self.hasher.hash(new_password, &salt)?;
        if !self
            .storage
            .update_credentials(user.id, hashed_password, salt)
            .await?
        {
            return Err(not_found(user.id));
        }
        info!(user_id = user.id, %username, "password updated");
        Ok(user.id)
    }

    pub async fn update_location(
        &self,
        user_id: UserId,
        location: &str,
    ) -> Result<(), SkycastError> {
        if !self.storage.update_location(user_id, location).await? {
            return Err(not_found(user_id));
        }
        info!(user_id, %location, "location updated");
        Ok(())
    }
}

fn not_found(user_id: UserId) -> SkycastError {
    SkycastError::NotFound(format!("User {user_id} not found"))
}

fn invalid_credentials() -> SkycastError {
    SkycastError::Unauthorized("Invalid username or password.".to_string())
}
