//! Shared types for the commerce service.
//!
//! Identifier newtypes and the `Money` value object used across the
//! store, ledger, payment, and API crates.

pub mod ids;
pub mod money;

pub use ids::{OrderId, ProductId, UserId};
pub use money::Money;
