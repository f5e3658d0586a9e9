//! Route handlers.

pub mod auth;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod webhook;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use common::UserId;

use crate::AppState;
use crate::error::ApiError;

/// Resolves the caller identity from the `Authorization` header.
///
/// Rejects before any core logic runs; every request re-verifies, no
/// session state is consulted.
pub(crate) fn authenticate<S, P>(
    state: &AppState<S, P>,
    headers: &HeaderMap,
) -> Result<UserId, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    Ok(state.verifier.verify_header(header)?)
}
