//! Payment integration for the commerce service.
//!
//! Two halves, joined only through the order ledger:
//!
//! - the **payment intent bridge** translates a pending order into an
//!   external payment intent and records the processor's reference on the
//!   order before the caller ever sees it as payable;
//! - the **webhook reconciler** verifies inbound processor events against
//!   the exact bytes received, maps them onto guarded ledger transitions,
//!   and acknowledges everything authentic, replays and stragglers
//!   included, so the sender never retries what retrying cannot fix.

pub mod bridge;
pub mod error;
pub mod event;
pub mod processor;
pub mod reconciler;
pub mod signature;

pub use bridge::PaymentBridge;
pub use error::{BridgeError, SignatureError, WebhookError};
pub use event::{EventKind, ProcessorEvent};
pub use processor::{InMemoryProcessor, PaymentIntent, PaymentProcessor};
pub use reconciler::{Ack, WebhookReconciler};
pub use signature::{SIGNATURE_HEADER, SignatureVerifier};
