//! Ledger error types.

use common::OrderId;
use store::{Order, StoreError};
use thiserror::Error;

/// Client-fixable input errors for order creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The product reference must be a non-empty identifier.
    #[error("product ref must not be empty")]
    EmptyProductRef,

    /// The amount must be a positive number of currency units.
    #[error("amount must be positive, got {cents} cents")]
    NonPositiveAmount { cents: i64 },
}

/// Errors that can occur during ledger operations.
///
/// `AlreadyAttached`, `AlreadyResolved`, and `RefMismatch` describe
/// concurrency/idempotency conditions rather than faults; callers on the
/// event path treat `AlreadyResolved` as success and `RefMismatch` as an
/// acknowledged no-op.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad input from the caller.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order already carries a *different* external reference;
    /// the stored reference was not mutated.
    #[error("order {order_id} already attached to external ref {existing}")]
    AlreadyAttached { order_id: OrderId, existing: String },

    /// The order is already in a terminal status. Carries the stored
    /// record unchanged; the desired end state may already hold.
    #[error("order {} already resolved to {}", .existing.id, .existing.status)]
    AlreadyResolved { existing: Order },

    /// The supplied reference does not equal the stored one; defends
    /// against cross-wiring an event to the wrong order.
    #[error("order {order_id}: external ref mismatch")]
    RefMismatch { order_id: OrderId },

    /// No order with the given id exists.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// An error occurred in the record store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
