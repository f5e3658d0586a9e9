//! Product records and the product-store boundary.
//!
//! Plain catalog CRUD; no lifecycle, no concurrency hazards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: Option<String>,
}

/// Store boundary for catalog products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists a new product.
    async fn insert_product(&self, new: NewProduct) -> Result<Product>;

    /// Returns all products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>>;
}
