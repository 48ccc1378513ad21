use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use tracing::error;

use crate::error::SkycastError;

/// One-way credential hashing. Salt and hash are opaque strings to callers.
pub trait CredentialHasher: Send + Sync {
    fn generate_salt(&self) -> String;
    fn hash(&self, password: &str, salt: &str) -> Result<String, SkycastError>;

    /// Recompute with `salt` and compare against `expected` in constant time.
    fn verify(&self, password: &str, salt: &str, expected: &str) -> Result<bool, SkycastError> {
        let computed = self.hash(password, salt)?;
        Ok(bool::from(computed.as_bytes().ct_eq(expected.as_bytes())))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn generate_salt(&self) -> String {
        SaltString::generate(&mut OsRng).as_str().to_string()
    }

    fn hash(&self, password: &str, salt: &str) -> Result<String, SkycastError> {
        let salt = SaltString::from_b64(salt).map_err(|e| {
            error!(error = %e, "stored salt is not valid b64");
            SkycastError::Hashing(e.to_string())
        })?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                SkycastError::Hashing(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }
}
