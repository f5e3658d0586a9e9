//! The order ledger service.

use common::{Money, OrderId, UserId};
use store::{
    AttachOutcome, NewOrder, Order, OrderStatus, OrderStore, TransitionOutcome,
};

use crate::error::{LedgerError, Result, ValidationError};

/// A terminal payment outcome reported by the processor.
///
/// Transitions target only terminal statuses; `pending` is not a valid
/// destination, so it is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

impl PaymentOutcome {
    /// The order status this outcome resolves to.
    pub fn status(&self) -> OrderStatus {
        match self {
            PaymentOutcome::Succeeded => OrderStatus::Success,
            PaymentOutcome::Failed => OrderStatus::Failed,
        }
    }
}

impl std::fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// Service owning order records and their lifecycle.
///
/// All mutation goes through the store's conditional operations; the
/// ledger never reads a record and writes it back.
#[derive(Clone)]
pub struct OrderLedger<S> {
    store: S,
}

impl<S: OrderStore> OrderLedger<S> {
    /// Creates a new ledger over the given order store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an order in the `pending` state with no external reference.
    ///
    /// Rejects a non-positive amount or an empty product ref with
    /// [`ValidationError`].
    #[tracing::instrument(skip(self))]
    pub async fn create_order(
        &self,
        owner_id: UserId,
        product_ref: &str,
        amount: Money,
    ) -> Result<Order> {
        if product_ref.trim().is_empty() {
            return Err(ValidationError::EmptyProductRef.into());
        }
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount {
                cents: amount.cents(),
            }
            .into());
        }

        let order = self
            .store
            .insert_order(NewOrder {
                id: OrderId::new(),
                owner_id,
                product_ref: product_ref.to_string(),
                amount,
            })
            .await?;

        metrics::counter!("ledger_orders_created").increment(1);
        tracing::info!(order_id = %order.id, "order created");
        Ok(order)
    }

    /// Sets the external payment reference iff it is currently unset.
    ///
    /// Repeating the call with the same reference is an idempotent no-op
    /// returning the stored record; a different reference fails with
    /// [`LedgerError::AlreadyAttached`] without mutating anything.
    #[tracing::instrument(skip(self))]
    pub async fn attach_external_ref(
        &self,
        order_id: OrderId,
        external_ref: &str,
    ) -> Result<Order> {
        match self.store.attach_external_ref(order_id, external_ref).await? {
            AttachOutcome::Attached(order) => {
                tracing::info!(order_id = %order_id, external_ref, "external ref attached");
                Ok(order)
            }
            AttachOutcome::AlreadyAttached(order)
                if order.external_payment_ref.as_deref() == Some(external_ref) =>
            {
                Ok(order)
            }
            AttachOutcome::AlreadyAttached(order) => Err(LedgerError::AlreadyAttached {
                order_id,
                existing: order.external_payment_ref.unwrap_or_default(),
            }),
            AttachOutcome::NotFound => Err(LedgerError::NotFound(order_id)),
        }
    }

    /// Applies `pending -> success | failed`, guarded by the stored
    /// external reference.
    ///
    /// Succeeds only if the current status is `pending` AND the stored
    /// reference equals `matching_ref`, applied as one atomic
    /// compare-and-set at the store. An already-terminal order yields
    /// [`LedgerError::AlreadyResolved`] carrying the record unchanged; a
    /// reference mismatch yields [`LedgerError::RefMismatch`].
    #[tracing::instrument(skip(self))]
    pub async fn transition(
        &self,
        order_id: OrderId,
        matching_ref: &str,
        outcome: PaymentOutcome,
    ) -> Result<Order> {
        match self
            .store
            .transition_order(order_id, matching_ref, outcome.status())
            .await?
        {
            TransitionOutcome::Applied(order) => {
                metrics::counter!("ledger_transitions_applied").increment(1);
                tracing::info!(order_id = %order_id, status = %order.status, "order resolved");
                Ok(order)
            }
            TransitionOutcome::AlreadyTerminal(existing) => {
                Err(LedgerError::AlreadyResolved { existing })
            }
            TransitionOutcome::RefMismatch(_) => Err(LedgerError::RefMismatch { order_id }),
            TransitionOutcome::NotFound => Err(LedgerError::NotFound(order_id)),
        }
    }

    /// Loads an order by id.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.get_order(order_id).await?)
    }

    /// Returns the owner's orders, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_owner(&self, owner_id: UserId) -> Result<Vec<Order>> {
        Ok(self.store.orders_for_owner(owner_id).await?)
    }

    /// Resolves the order joined to an external payment reference.
    pub async fn find_by_external_ref(&self, external_ref: &str) -> Result<Option<Order>> {
        Ok(self.store.order_by_external_ref(external_ref).await?)
    }
}
