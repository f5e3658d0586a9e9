//! Payment processor trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId};

use crate::error::BridgeError;

/// An intent opened with the external processor.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// The processor's identifier for this payment attempt.
    pub id: String,

    /// Continuation token the client uses to complete payment.
    pub client_secret: String,
}

/// Trait for the external payment processor boundary.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Creates a payment intent for the given amount.
    ///
    /// The order id is caller-supplied correlation metadata, carried back
    /// verbatim in later processor events so they can be traced to the
    /// order without relying on the processor's own identifiers alone.
    async fn create_intent(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentIntent, BridgeError>;
}

#[derive(Debug, Default)]
struct InMemoryProcessorState {
    intents: HashMap<String, (OrderId, Money)>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment processor for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProcessor {
    state: Arc<RwLock<InMemoryProcessorState>>,
}

impl InMemoryProcessor {
    /// Creates a new in-memory payment processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the processor to fail on subsequent create calls.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of open intents.
    pub fn intent_count(&self) -> usize {
        self.state.read().unwrap().intents.len()
    }

    /// Returns true if an intent exists with the given ID.
    pub fn has_intent(&self, intent_id: &str) -> bool {
        self.state.read().unwrap().intents.contains_key(intent_id)
    }

    /// Returns the correlation order id recorded for an intent.
    pub fn correlation_for(&self, intent_id: &str) -> Option<OrderId> {
        self.state
            .read()
            .unwrap()
            .intents
            .get(intent_id)
            .map(|(order_id, _)| *order_id)
    }
}

#[async_trait]
impl PaymentProcessor for InMemoryProcessor {
    async fn create_intent(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentIntent, BridgeError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(BridgeError::Processor("intent declined".to_string()));
        }

        state.next_id += 1;
        let id = format!("pi_{:04}", state.next_id);
        state.intents.insert(id.clone(), (order_id, amount));

        Ok(PaymentIntent {
            client_secret: format!("{id}_secret"),
            id,
        })
    }
}
