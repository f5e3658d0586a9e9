//! Password hashing.

use bcrypt::DEFAULT_COST;

use crate::error::AuthError;

/// Hashes a plaintext password with a per-hash random salt.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(plain, DEFAULT_COST)?)
}

/// Checks a plaintext password against a stored hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(plain, hashed)?)
}
