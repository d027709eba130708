//! Argon2id password hashing
//!
//! Hashes are stored in PHC string format, so the algorithm parameters and
//! salt travel with the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a plaintext password with a random salt
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored hash
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash
/// could not be read.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::MalformedHash(e.to_string())),
    }
}
