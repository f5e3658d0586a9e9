//! Order ledger for the commerce service.
//!
//! Owns order records and their lifecycle: creation with validation,
//! one-time attachment of the external payment reference, and the
//! guarded `pending -> success | failed` transition. The transition is a
//! compare-and-set on `(status, external_payment_ref)` delegated to the
//! store boundary, so replaying the same logical outcome any number of
//! times, or racing two contradicting outcomes, resolves to exactly one
//! effective terminal write.

pub mod error;
pub mod ledger;

pub use error::{LedgerError, ValidationError};
pub use ledger::{OrderLedger, PaymentOutcome};
