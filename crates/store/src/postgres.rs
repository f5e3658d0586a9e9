use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    AttachOutcome, NewOrder, NewProduct, NewUser, Order, OrderStatus, OrderStore, Product,
    ProductStore, Result, StoreError, TransitionOutcome, User, UserStore,
};

/// PostgreSQL-backed store implementation.
///
/// The conditional operations are single `UPDATE ... WHERE` statements,
/// so the guard and the write commit together regardless of how many
/// replicas share the database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let status_str: String = row.try_get("status")?;
        let status =
            OrderStatus::parse(&status_str).ok_or(StoreError::UnknownStatus(status_str))?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            owner_id: UserId::from_uuid(row.try_get::<Uuid, _>("owner_id")?),
            product_ref: row.try_get("product_ref")?,
            amount: Money::from_cents(row.try_get("amount_cents")?),
            status,
            external_payment_ref: row.try_get("external_payment_ref")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            category: row.try_get("category")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, new: NewOrder) -> Result<Order> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (id, owner_id, product_ref, amount_cents, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, product_ref, amount_cents, status,
                      external_payment_ref, created_at, updated_at
            "#,
        )
        .bind(new.id.as_uuid())
        .bind(new.owner_id.as_uuid())
        .bind(&new.product_ref)
        .bind(new.amount.cents())
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_order(row)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, product_ref, amount_cents, status,
                   external_payment_ref, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn orders_for_owner(&self, owner_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, product_ref, amount_cents, status,
                   external_payment_ref, created_at, updated_at
            FROM orders
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn order_by_external_ref(&self, external_ref: &str) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, product_ref, amount_cents, status,
                   external_payment_ref, created_at, updated_at
            FROM orders
            WHERE external_payment_ref = $1
            "#,
        )
        .bind(external_ref)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn attach_external_ref(
        &self,
        id: OrderId,
        external_ref: &str,
    ) -> Result<AttachOutcome> {
        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET external_payment_ref = $2, updated_at = now()
            WHERE id = $1 AND external_payment_ref IS NULL
            RETURNING id, owner_id, product_ref, amount_cents, status,
                      external_payment_ref, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(external_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // The partial unique index rejects a ref already joined to
            // another order.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_external_payment_ref_key")
            {
                return StoreError::DuplicateExternalRef(external_ref.to_string());
            }
            StoreError::Database(e)
        })?;

        match updated {
            Some(row) => Ok(AttachOutcome::Attached(Self::row_to_order(row)?)),
            None => match self.get_order(id).await? {
                Some(order) => Ok(AttachOutcome::AlreadyAttached(order)),
                None => Ok(AttachOutcome::NotFound),
            },
        }
    }

    async fn transition_order(
        &self,
        id: OrderId,
        expected_ref: &str,
        to: OrderStatus,
    ) -> Result<TransitionOutcome> {
        debug_assert!(to.is_terminal());

        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = 'pending' AND external_payment_ref = $2
            RETURNING id, owner_id, product_ref, amount_cents, status,
                      external_payment_ref, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(expected_ref)
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(TransitionOutcome::Applied(Self::row_to_order(row)?)),
            // The guard did not match; re-read to classify for the caller.
            None => match self.get_order(id).await? {
                None => Ok(TransitionOutcome::NotFound),
                Some(order) if order.status.is_terminal() => {
                    Ok(TransitionOutcome::AlreadyTerminal(order))
                }
                Some(order) => Ok(TransitionOutcome::RefMismatch(order)),
            },
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, new: NewUser) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(new.id.as_uuid())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("users_email_key")
            {
                return StoreError::DuplicateEmail(new.email.clone());
            }
            StoreError::Database(e)
        })?;

        Self::row_to_user(row)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn insert_product(&self, new: NewProduct) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price_cents, category, created_at, updated_at
            "#,
        )
        .bind(new.id.as_uuid())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price.cents())
        .bind(&new.category)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, category, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }
}
