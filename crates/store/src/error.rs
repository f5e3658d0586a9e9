use thiserror::Error;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another user is already registered with this email.
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    /// The external payment reference is already attached to a different order.
    #[error("Duplicate external payment ref: {0}")]
    DuplicateExternalRef(String),

    /// A persisted status value could not be decoded.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
