//! Record store boundary for the commerce service.
//!
//! Defines the record types (users, products, orders) and the store traits
//! the rest of the system is written against, plus two implementations:
//! an in-memory store for tests and development, and a PostgreSQL store.
//!
//! The order store's conditional operations (`attach_external_ref`,
//! `transition_order`) are the atomicity boundary: each is a single
//! compare-and-set, never a read-modify-write pair, so they stay correct
//! when webhook deliveries for the same order race across workers or
//! replicas.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod product;
pub mod user;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use order::{AttachOutcome, NewOrder, Order, OrderStatus, OrderStore, TransitionOutcome};
pub use postgres::PgStore;
pub use product::{NewProduct, Product, ProductStore};
pub use user::{NewUser, User, UserStore};
