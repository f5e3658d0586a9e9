//! API error types with HTTP response mapping.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger::LedgerError;
use payment::{BridgeError, WebhookError};
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Caller could not be authenticated.
    Unauthorized(String),
    /// Credential verification error.
    Auth(AuthError),
    /// Order ledger error.
    Ledger(LedgerError),
    /// Payment bridge error.
    Bridge(BridgeError),
    /// Webhook reconciliation error.
    Webhook(WebhookError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Auth(err) => auth_error_to_response(err),
            ApiError::Ledger(err) => ledger_error_to_response(err),
            ApiError::Bridge(err) => bridge_error_to_response(err),
            ApiError::Webhook(err) => webhook_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn auth_error_to_response(err: AuthError) -> (StatusCode, String) {
    match &err {
        AuthError::Missing | AuthError::Invalid => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthError::Issue(_) | AuthError::Hash(_) => {
            tracing::error!(error = %err, "credential subsystem failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn ledger_error_to_response(err: LedgerError) -> (StatusCode, String) {
    match &err {
        LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        LedgerError::AlreadyAttached { .. }
        | LedgerError::AlreadyResolved { .. }
        | LedgerError::RefMismatch { .. } => (StatusCode::CONFLICT, err.to_string()),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        LedgerError::Store(_) => {
            tracing::error!(error = %err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn bridge_error_to_response(err: BridgeError) -> (StatusCode, String) {
    match err {
        BridgeError::Ledger(inner) => ledger_error_to_response(inner),
        other => {
            // The order stays pending with no reference; the caller can
            // safely re-trigger intent creation.
            tracing::error!(error = %other, "payment processor failure");
            (StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}

fn webhook_error_to_response(err: WebhookError) -> (StatusCode, String) {
    match err {
        WebhookError::Signature(inner) => (StatusCode::BAD_REQUEST, inner.to_string()),
        WebhookError::Ledger(inner) => ledger_error_to_response(inner),
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        ApiError::Bridge(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::Webhook(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => {
                ApiError::BadRequest("user already exists".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
