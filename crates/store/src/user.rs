//! User records and the user-store boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A registered user.
///
/// The credential secret is stored only as a salted one-way hash, never
/// in plaintext. The record is immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique contact identifier.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Store boundary for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user; fails with
    /// [`StoreError::DuplicateEmail`](crate::StoreError::DuplicateEmail)
    /// if the email is already registered.
    async fn insert_user(&self, new: NewUser) -> Result<User>;

    /// Looks up a user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Looks up a user by email.
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
}
