//! Product catalog endpoints. Plain CRUD; no lifecycle.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use common::{Money, ProductId};
use payment::PaymentProcessor;
use serde::{Deserialize, Serialize};
use store::{NewProduct, OrderStore, Product, ProductStore, UserStore};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::authenticate;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
    pub created_at: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price.cents(),
            category: product.category.clone(),
            created_at: product.created_at.to_rfc3339(),
        }
    }
}

/// POST /products — add a catalog product.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    headers: HeaderMap,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    authenticate(&state, &headers)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if req.price_cents <= 0 {
        return Err(ApiError::BadRequest("price must be positive".to_string()));
    }

    let product = state
        .store
        .insert_product(NewProduct {
            id: ProductId::new(),
            name: req.name,
            description: req.description,
            price: Money::from_cents(req.price_cents),
            category: req.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /products — list the catalog, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let products = state.store.list_products().await?;
    let responses = products.iter().map(ProductResponse::from).collect();
    Ok(Json(responses))
}
