//! The inbound processor event contract.

use std::collections::HashMap;

use common::OrderId;
use serde::Deserialize;
use uuid::Uuid;

/// Event kind recognized as `payment.succeeded`.
pub const KIND_SUCCEEDED: &str = "payment.succeeded";

/// Event kind recognized as `payment.failed`.
pub const KIND_FAILED: &str = "payment.failed";

/// Metadata key under which the correlation order id travels.
pub const METADATA_ORDER_ID: &str = "order_id";

/// Classification of an event's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Succeeded,
    Failed,

    /// Anything else in the processor's event vocabulary. Acknowledged
    /// and ignored, so vocabulary growth never becomes an error here.
    Unrecognized,
}

/// A processor event as delivered on the webhook.
///
/// The kind stays a plain string rather than a closed enum for the same
/// forward-compatibility reason.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: IntentObject,
}

/// The payment intent embedded in an event.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentObject {
    /// The processor's intent identifier.
    pub id: String,

    /// Caller-supplied correlation metadata, echoed back verbatim.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ProcessorEvent {
    /// Classifies the event kind.
    pub fn classify(&self) -> EventKind {
        match self.kind.as_str() {
            KIND_SUCCEEDED => EventKind::Succeeded,
            KIND_FAILED => EventKind::Failed,
            _ => EventKind::Unrecognized,
        }
    }

    /// The correlation order id supplied at intent creation, if present
    /// and well-formed.
    pub fn order_id(&self) -> Option<OrderId> {
        self.data
            .object
            .metadata
            .get(METADATA_ORDER_ID)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(OrderId::from_uuid)
    }

    /// The intent identifier carried by the event.
    pub fn intent_ref(&self) -> &str {
        &self.data.object.id
    }
}
