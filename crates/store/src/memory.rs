use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, ProductId, UserId};
use tokio::sync::RwLock;

use crate::{
    AttachOutcome, NewOrder, NewProduct, NewUser, Order, OrderStatus, OrderStore, Product,
    ProductStore, Result, StoreError, TransitionOutcome, User, UserStore,
};

/// In-memory store implementation for testing and development.
///
/// Provides the same interface as the PostgreSQL implementation. Each
/// conditional operation runs under a single write lock, which gives the
/// same atomicity the PostgreSQL implementation gets from one-statement
/// conditional updates.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all records.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
        self.users.write().await.clear();
        self.products.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, new: NewOrder) -> Result<Order> {
        let now = Utc::now();
        let order = Order {
            id: new.id,
            owner_id: new.owner_id,
            product_ref: new.product_ref,
            amount: new.amount,
            status: OrderStatus::Pending,
            external_payment_ref: None,
            created_at: now,
            updated_at: now,
        };

        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn orders_for_owner(&self, owner_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut owned: Vec<_> = orders
            .values()
            .filter(|o| o.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn order_by_external_ref(&self, external_ref: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.external_payment_ref.as_deref() == Some(external_ref))
            .cloned())
    }

    async fn attach_external_ref(
        &self,
        id: OrderId,
        external_ref: &str,
    ) -> Result<AttachOutcome> {
        let mut orders = self.orders.write().await;

        // Simulates the partial unique index on external_payment_ref.
        if orders
            .values()
            .any(|o| o.id != id && o.external_payment_ref.as_deref() == Some(external_ref))
        {
            return Err(StoreError::DuplicateExternalRef(external_ref.to_string()));
        }

        match orders.get_mut(&id) {
            None => Ok(AttachOutcome::NotFound),
            Some(order) if order.external_payment_ref.is_some() => {
                Ok(AttachOutcome::AlreadyAttached(order.clone()))
            }
            Some(order) => {
                order.external_payment_ref = Some(external_ref.to_string());
                order.updated_at = Utc::now();
                Ok(AttachOutcome::Attached(order.clone()))
            }
        }
    }

    async fn transition_order(
        &self,
        id: OrderId,
        expected_ref: &str,
        to: OrderStatus,
    ) -> Result<TransitionOutcome> {
        debug_assert!(to.is_terminal());

        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            None => Ok(TransitionOutcome::NotFound),
            Some(order) if order.status.is_terminal() => {
                Ok(TransitionOutcome::AlreadyTerminal(order.clone()))
            }
            Some(order) if order.external_payment_ref.as_deref() != Some(expected_ref) => {
                Ok(TransitionOutcome::RefMismatch(order.clone()))
            }
            Some(order) => {
                order.status = to;
                order.updated_at = Utc::now();
                Ok(TransitionOutcome::Applied(order.clone()))
            }
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, new: NewUser) -> Result<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }

        let now = Utc::now();
        let user = User {
            id: new.id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert_product(&self, new: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: new.id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            created_at: now,
            updated_at: now,
        };

        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut all: Vec<_> = products.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use common::Money;

    use super::*;

    fn new_order(owner_id: UserId) -> NewOrder {
        NewOrder {
            id: OrderId::new(),
            owner_id,
            product_ref: "sku-1".to_string(),
            amount: Money::from_cents(500),
        }
    }

    #[tokio::test]
    async fn insert_and_get_order() {
        let store = InMemoryStore::new();
        let owner = UserId::new();

        let order = store.insert_order(new_order(owner)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.external_payment_ref, None);

        let fetched = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn orders_for_owner_filters_and_sorts_newest_first() {
        let store = InMemoryStore::new();
        let owner = UserId::new();
        let other = UserId::new();

        let first = store.insert_order(new_order(owner)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.insert_order(new_order(owner)).await.unwrap();
        store.insert_order(new_order(other)).await.unwrap();

        let owned = store.orders_for_owner(owner).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].id, second.id);
        assert_eq!(owned[1].id, first.id);
    }

    #[tokio::test]
    async fn attach_sets_ref_once() {
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();

        let outcome = store.attach_external_ref(order.id, "pi_abc").await.unwrap();
        let attached = match outcome {
            AttachOutcome::Attached(o) => o,
            other => panic!("expected Attached, got {other:?}"),
        };
        assert_eq!(attached.external_payment_ref.as_deref(), Some("pi_abc"));

        // A second attach does not overwrite, whatever the ref.
        let outcome = store.attach_external_ref(order.id, "pi_xyz").await.unwrap();
        match outcome {
            AttachOutcome::AlreadyAttached(o) => {
                assert_eq!(o.external_payment_ref.as_deref(), Some("pi_abc"));
            }
            other => panic!("expected AlreadyAttached, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn attach_rejects_ref_held_by_another_order() {
        let store = InMemoryStore::new();
        let a = store.insert_order(new_order(UserId::new())).await.unwrap();
        let b = store.insert_order(new_order(UserId::new())).await.unwrap();

        store.attach_external_ref(a.id, "pi_abc").await.unwrap();
        let result = store.attach_external_ref(b.id, "pi_abc").await;
        assert!(matches!(result, Err(StoreError::DuplicateExternalRef(_))));
    }

    #[tokio::test]
    async fn attach_unknown_order_is_not_found() {
        let store = InMemoryStore::new();
        let outcome = store
            .attach_external_ref(OrderId::new(), "pi_abc")
            .await
            .unwrap();
        assert!(matches!(outcome, AttachOutcome::NotFound));
    }

    #[tokio::test]
    async fn transition_applies_once_and_sticks() {
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();
        store.attach_external_ref(order.id, "pi_abc").await.unwrap();

        let outcome = store
            .transition_order(order.id, "pi_abc", OrderStatus::Success)
            .await
            .unwrap();
        match outcome {
            TransitionOutcome::Applied(o) => assert_eq!(o.status, OrderStatus::Success),
            other => panic!("expected Applied, got {other:?}"),
        }

        // A contradicting outcome after the terminal state is refused.
        let outcome = store
            .transition_order(order.id, "pi_abc", OrderStatus::Failed)
            .await
            .unwrap();
        match outcome {
            TransitionOutcome::AlreadyTerminal(o) => assert_eq!(o.status, OrderStatus::Success),
            other => panic!("expected AlreadyTerminal, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transition_requires_matching_ref() {
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();
        store.attach_external_ref(order.id, "pi_abc").await.unwrap();

        let outcome = store
            .transition_order(order.id, "pi_other", OrderStatus::Success)
            .await
            .unwrap();
        assert!(matches!(outcome, TransitionOutcome::RefMismatch(_)));

        let fetched = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn transition_with_unattached_ref_is_mismatch() {
        // The event-before-attach window: the stored ref is still null,
        // so the guard must refuse.
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();

        let outcome = store
            .transition_order(order.id, "pi_abc", OrderStatus::Success)
            .await
            .unwrap();
        assert!(matches!(outcome, TransitionOutcome::RefMismatch(_)));
    }

    #[tokio::test]
    async fn concurrent_transitions_apply_exactly_once() {
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();
        store.attach_external_ref(order.id, "pi_abc").await.unwrap();

        let mut handles = Vec::new();
        for to in [OrderStatus::Success, OrderStatus::Failed] {
            let store = store.clone();
            let id = order.id;
            handles.push(tokio::spawn(async move {
                store.transition_order(id, "pi_abc", to).await.unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), TransitionOutcome::Applied(_)) {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);

        let fetched = store.get_order(order.id).await.unwrap().unwrap();
        assert!(fetched.status.is_terminal());
    }

    #[tokio::test]
    async fn order_by_external_ref_resolves_after_attach() {
        let store = InMemoryStore::new();
        let order = store.insert_order(new_order(UserId::new())).await.unwrap();

        assert!(
            store
                .order_by_external_ref("pi_abc")
                .await
                .unwrap()
                .is_none()
        );

        store.attach_external_ref(order.id, "pi_abc").await.unwrap();
        let found = store.order_by_external_ref("pi_abc").await.unwrap().unwrap();
        assert_eq!(found.id, order.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();

        let new = |email: &str| NewUser {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$hash".to_string(),
        };

        store.insert_user(new("ada@example.com")).await.unwrap();
        let result = store.insert_user(new("ada@example.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn user_lookup_by_email() {
        let store = InMemoryStore::new();
        let user = store
            .insert_user(NewUser {
                id: UserId::new(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "$2b$10$hash".to_string(),
            })
            .await
            .unwrap();

        let found = store.user_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn products_list_newest_first() {
        let store = InMemoryStore::new();

        let new = |name: &str| NewProduct {
            id: ProductId::new(),
            name: name.to_string(),
            description: None,
            price: Money::from_cents(1000),
            category: Some("widgets".to_string()),
        };

        store.insert_product(new("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.insert_product(new("second")).await.unwrap();

        let all = store.list_products().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "second");
    }
}
