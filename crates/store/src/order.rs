//! Order records and the order-store boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// The payment status of an order.
///
/// `pending` is the sole initial state; `success` and `failed` are
/// terminal. A terminal status is sticky: no store operation transitions
/// out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting a payment outcome.
    #[default]
    Pending,

    /// Payment confirmed (terminal state).
    Success,

    /// Payment rejected (terminal state).
    Failed,
}

impl OrderStatus {
    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Success | OrderStatus::Failed)
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Success => "success",
            OrderStatus::Failed => "failed",
        }
    }

    /// Parses a stored status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "success" => Some(OrderStatus::Success),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Server-generated, immutable.
    pub id: OrderId,

    /// Owning user; set at creation, immutable.
    pub owner_id: UserId,

    /// Product identifier supplied by the caller; immutable.
    pub product_ref: String,

    /// Amount in the smallest currency unit; immutable.
    pub amount: Money,

    /// Lifecycle status; mutated only through [`OrderStore::transition_order`].
    pub status: OrderStatus,

    /// The payment processor's identifier for this order's payment attempt.
    /// Set exactly once through [`OrderStore::attach_external_ref`]; the
    /// idempotent join key for inbound processor events.
    pub external_payment_ref: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new order.
///
/// Status starts `pending`, the external reference starts unset, and
/// timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub owner_id: UserId,
    pub product_ref: String,
    pub amount: Money,
}

/// Result of a conditional attach of an external payment reference.
#[derive(Debug, Clone)]
pub enum AttachOutcome {
    /// The reference was attached; the order previously had none.
    Attached(Order),

    /// The order already carries a reference (possibly the same one);
    /// nothing was written. The returned record holds the stored reference.
    AlreadyAttached(Order),

    /// No order with the given id exists.
    NotFound,
}

/// Result of a conditional terminal transition.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The order moved from `pending` to the requested terminal status.
    Applied(Order),

    /// The order was already in a terminal status; nothing was written.
    AlreadyTerminal(Order),

    /// The stored external reference did not equal the expected one
    /// (including the not-yet-attached case); nothing was written.
    RefMismatch(Order),

    /// No order with the given id exists.
    NotFound,
}

/// Store boundary for order records.
///
/// All implementations must be thread-safe (Send + Sync), and the
/// conditional operations must be atomic at the storage layer: two
/// concurrent calls for the same order must serialize such that at most
/// one observes the guarded precondition as satisfied.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order with status `pending` and no external reference.
    async fn insert_order(&self, new: NewOrder) -> Result<Order>;

    /// Looks up an order by id.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns all orders belonging to an owner, newest first.
    async fn orders_for_owner(&self, owner_id: UserId) -> Result<Vec<Order>>;

    /// Looks up the order joined to an external payment reference.
    async fn order_by_external_ref(&self, external_ref: &str) -> Result<Option<Order>>;

    /// Sets `external_payment_ref` iff it is currently unset.
    ///
    /// A reference attached to a *different* order fails with
    /// [`StoreError::DuplicateExternalRef`](crate::StoreError::DuplicateExternalRef).
    async fn attach_external_ref(
        &self,
        id: OrderId,
        external_ref: &str,
    ) -> Result<AttachOutcome>;

    /// Applies `pending -> to` iff the current status is `pending` AND the
    /// stored external reference equals `expected_ref`, as one atomic
    /// compare-and-set over the `(status, external_payment_ref)` pair.
    ///
    /// `to` must be a terminal status.
    async fn transition_order(
        &self,
        id: OrderId,
        expected_ref: &str,
        to: OrderStatus,
    ) -> Result<TransitionOutcome>;
}
