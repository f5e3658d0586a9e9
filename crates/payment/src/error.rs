//! Payment error types.

use ledger::LedgerError;
use thiserror::Error;

/// Errors from the payment intent bridge. Transient by design: the order
/// stays `pending` with no reference and a later retrigger is safe.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The external processor rejected or failed the intent creation.
    #[error("payment processor error: {0}")]
    Processor(String),

    /// The processor call exceeded its bounded timeout.
    #[error("payment processor timed out")]
    Timeout,

    /// Recording the external reference on the order failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Webhook authenticity failures, the only condition that rejects an
/// inbound event at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No signature header was supplied.
    #[error("missing signature header")]
    MissingHeader,

    /// The header is not valid hex.
    #[error("malformed signature header")]
    Malformed,

    /// The signature does not match the received body.
    #[error("signature mismatch")]
    Mismatch,
}

/// Errors surfaced by the webhook reconciler.
///
/// Business-level ledger conditions (`AlreadyResolved`, `RefMismatch`)
/// never appear here; the reconciler converts them to acknowledgements.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The event failed authenticity verification.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The ledger or its store failed; the sender should retry delivery.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
