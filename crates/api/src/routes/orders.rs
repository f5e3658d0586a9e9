//! Order creation and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use common::Money;
use payment::PaymentProcessor;
use serde::{Deserialize, Serialize};
use store::{Order, OrderStore, ProductStore, UserStore};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::authenticate;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    /// Non-empty product identifier.
    pub product_ref: String,
    /// Positive amount in the smallest currency unit.
    pub amount_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub product_ref: String,
    pub amount_cents: i64,
    pub status: String,
    pub external_payment_ref: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            product_ref: order.product_ref.clone(),
            amount_cents: order.amount.cents(),
            status: order.status.to_string(),
            external_payment_ref: order.external_payment_ref.clone(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub order: OrderResponse,
    /// Continuation token for the client to complete payment.
    pub client_secret: String,
}

/// POST /orders — create an order and open its payment intent.
///
/// The order is created `pending`, the external intent is opened, and
/// the reference is attached before this returns. If the processor step
/// fails, the response is a server-side failure and the order stays
/// `pending` with no reference, retriable by creating the intent again.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let owner_id = authenticate(&state, &headers)?;

    let order = state
        .ledger
        .create_order(owner_id, &req.product_ref, Money::from_cents(req.amount_cents))
        .await?;

    let intent = state.bridge.open_intent(&order).await?;

    // Re-read so the response carries the attached reference.
    let order = state
        .ledger
        .get_order(order.id)
        .await?
        .ok_or_else(|| ApiError::Internal("order missing after intent open".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            order: OrderResponse::from(&order),
            client_secret: intent.client_secret,
        }),
    ))
}

/// GET /orders — the authenticated caller's own orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let owner_id = authenticate(&state, &headers)?;

    let orders = state.ledger.orders_for_owner(owner_id).await?;
    let responses = orders.iter().map(OrderResponse::from).collect();
    Ok(Json(responses))
}
