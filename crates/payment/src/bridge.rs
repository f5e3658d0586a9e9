//! Payment intent bridge: pending order -> external intent -> attached ref.

use std::time::Duration;

use ledger::OrderLedger;
use store::{Order, OrderStore};

use crate::error::BridgeError;
use crate::processor::{PaymentIntent, PaymentProcessor};

/// Bound on the external intent-creation call.
const DEFAULT_PROCESSOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens external payment intents and records their references.
pub struct PaymentBridge<S, P> {
    ledger: OrderLedger<S>,
    processor: P,
    processor_timeout: Duration,
}

impl<S: OrderStore, P: PaymentProcessor> PaymentBridge<S, P> {
    /// Creates a new bridge over the given ledger and processor.
    pub fn new(ledger: OrderLedger<S>, processor: P) -> Self {
        Self {
            ledger,
            processor,
            processor_timeout: DEFAULT_PROCESSOR_TIMEOUT,
        }
    }

    /// Overrides the processor call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.processor_timeout = timeout;
        self
    }

    /// Opens a payment intent for the order and attaches its reference.
    ///
    /// The reference is attached *before* success is reported: an order
    /// with status `pending` and no reference is not yet payable and must
    /// never be presented to the caller as such. On processor failure or
    /// timeout the order keeps its null reference, a resumable state:
    /// the attach guard makes a reopened intent safe.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn open_intent(&self, order: &Order) -> Result<PaymentIntent, BridgeError> {
        let intent = tokio::time::timeout(
            self.processor_timeout,
            self.processor.create_intent(order.id, order.amount),
        )
        .await
        .map_err(|_| BridgeError::Timeout)??;

        self.ledger.attach_external_ref(order.id, &intent.id).await?;

        metrics::counter!("payment_intents_opened").increment(1);
        tracing::info!(intent_id = %intent.id, "payment intent opened");
        Ok(intent)
    }
}
