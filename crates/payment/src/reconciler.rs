//! Webhook reconciliation: verified processor events to ledger transitions.

use ledger::{LedgerError, OrderLedger, PaymentOutcome};
use store::{Order, OrderStore};

use crate::error::WebhookError;
use crate::event::{EventKind, ProcessorEvent};
use crate::signature::SignatureVerifier;

/// Acknowledgement for an authentic event.
///
/// Every variant is acknowledged to the sender; the distinction exists
/// for observability, not for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// A terminal transition was applied to an order.
    Applied,

    /// The order was already resolved; an idempotent replay (or a late
    /// contradicting outcome, which the first outcome governs).
    AlreadyResolved,

    /// Authentic but produced no state change: unrecognized kind,
    /// unparseable body, unknown order, or mismatched reference.
    Ignored,
}

/// Stateless, re-entrant webhook event handler.
///
/// Re-delivering the same event any number of times, in any order
/// relative to events for unrelated orders, produces the same final
/// ledger state.
pub struct WebhookReconciler<S> {
    ledger: OrderLedger<S>,
    signature: SignatureVerifier,
}

impl<S: OrderStore> WebhookReconciler<S> {
    /// Creates a reconciler over the given ledger and signature secret.
    pub fn new(ledger: OrderLedger<S>, signature: SignatureVerifier) -> Self {
        Self { ledger, signature }
    }

    /// Processes one inbound event.
    ///
    /// Only an authenticity failure is an error the transport should
    /// reject with; a store failure propagates so the sender's retry
    /// policy can redeliver. Everything else acknowledges.
    #[tracing::instrument(skip_all)]
    pub async fn handle_event(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<Ack, WebhookError> {
        // 1. Authenticity, against the exact bytes received.
        self.signature.verify(raw_body, signature_header)?;
        metrics::counter!("webhook_events_received").increment(1);

        // 2. Parse and classify.
        let event: ProcessorEvent = match serde_json::from_slice(raw_body) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "authentic event with unparseable body, ignoring");
                return Ok(Ack::Ignored);
            }
        };

        let outcome = match event.classify() {
            EventKind::Succeeded => PaymentOutcome::Succeeded,
            EventKind::Failed => PaymentOutcome::Failed,
            EventKind::Unrecognized => {
                tracing::debug!(kind = %event.kind, "unrecognized event kind, ignoring");
                return Ok(Ack::Ignored);
            }
        };

        // 3. Resolve the target order.
        let Some(order) = self.resolve_order(&event).await? else {
            tracing::info!(
                intent_ref = event.intent_ref(),
                "event references no known order, ignoring"
            );
            return Ok(Ack::Ignored);
        };

        // 4. Guarded transition.
        match self
            .ledger
            .transition(order.id, event.intent_ref(), outcome)
            .await
        {
            Ok(_) => {
                metrics::counter!("webhook_events_applied").increment(1);
                Ok(Ack::Applied)
            }
            Err(LedgerError::AlreadyResolved { existing }) => {
                if existing.status != outcome.status() {
                    tracing::warn!(
                        order_id = %existing.id,
                        stored = %existing.status,
                        event = %outcome,
                        "late contradicting outcome; first outcome governs"
                    );
                }
                Ok(Ack::AlreadyResolved)
            }
            Err(LedgerError::RefMismatch { order_id }) => {
                tracing::warn!(
                    %order_id,
                    intent_ref = event.intent_ref(),
                    "event ref does not match stored ref, ignoring"
                );
                Ok(Ack::Ignored)
            }
            Err(LedgerError::NotFound(_)) => Ok(Ack::Ignored),
            Err(other) => Err(other.into()),
        }
    }

    /// Resolves the order an event refers to: by correlation order id
    /// from the metadata when present, else by the event's own intent
    /// identifier.
    async fn resolve_order(&self, event: &ProcessorEvent) -> Result<Option<Order>, WebhookError> {
        if let Some(order_id) = event.order_id()
            && let Some(order) = self.ledger.get_order(order_id).await?
        {
            return Ok(Some(order));
        }
        Ok(self.ledger.find_by_external_ref(event.intent_ref()).await?)
    }
}
