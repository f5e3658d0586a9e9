use thiserror::Error;

/// Errors that can occur while verifying or issuing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorization header was absent or not `Bearer `-prefixed.
    #[error("missing bearer credential")]
    Missing,

    /// The token failed signature or expiry verification.
    #[error("invalid or expired credential")]
    Invalid,

    /// Token issuance failed.
    #[error("token issuance failed: {0}")]
    Issue(jsonwebtoken::errors::Error),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
