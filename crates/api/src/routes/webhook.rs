//! Processor webhook endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use payment::{PaymentProcessor, SIGNATURE_HEADER};
use serde::Serialize;
use store::{OrderStore, ProductStore, UserStore};

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

/// POST /webhook — verified processor event intake.
///
/// The raw body must reach the reconciler unmodified: the signature is
/// computed over the exact bytes sent, so this handler takes `Bytes`
/// rather than a deserialized payload. Every authentic event is
/// acknowledged regardless of business outcome; only signature failure
/// rejects.
#[tracing::instrument(skip(state, headers, body))]
pub async fn handle<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    let ack = state.reconciler.handle_event(&body, signature).await?;
    tracing::debug!(?ack, "webhook event acknowledged");

    Ok(Json(WebhookAckResponse { received: true }))
}
