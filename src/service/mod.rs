pub mod normalizer;
pub mod password;
pub mod users;

pub use normalizer::normalize;
pub use password::{Argon2Hasher, CredentialHasher};
pub use users::UserService;
