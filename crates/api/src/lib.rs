//! HTTP API server for the commerce payment lifecycle service.
//!
//! Exposes registration/login, a small product catalog, authenticated
//! order creation (which opens an external payment intent), and the
//! webhook endpoint the payment processor reports outcomes to,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use auth::TokenVerifier;
use axum::Router;
use axum::routing::{get, post};
use ledger::OrderLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use payment::{
    InMemoryProcessor, PaymentBridge, PaymentProcessor, SignatureVerifier, WebhookReconciler,
};
use store::{InMemoryStore, OrderStore, ProductStore, UserStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S, P> {
    pub store: S,
    pub ledger: OrderLedger<S>,
    pub bridge: PaymentBridge<S, P>,
    pub reconciler: WebhookReconciler<S>,
    pub verifier: TokenVerifier,
}

/// Wires the application state from its collaborators.
///
/// Ledger, bridge, and reconciler each receive their dependencies here;
/// nothing is initialized behind module-level globals.
pub fn create_state<S, P>(store: S, processor: P, config: &Config) -> Arc<AppState<S, P>>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let ledger = OrderLedger::new(store.clone());
    let bridge = PaymentBridge::new(ledger.clone(), processor);
    let reconciler = WebhookReconciler::new(
        ledger.clone(),
        SignatureVerifier::new(&config.webhook_secret),
    );

    Arc::new(AppState {
        store,
        ledger,
        bridge,
        reconciler,
        verifier: TokenVerifier::new(&config.jwt_secret),
    })
}

/// Creates state over the in-memory store and processor.
///
/// Returns the store and processor handles as well, for tests that need
/// to inspect records or inject processor failures.
pub fn create_default_state(
    config: &Config,
) -> (
    Arc<AppState<InMemoryStore, InMemoryProcessor>>,
    InMemoryStore,
    InMemoryProcessor,
) {
    let store = InMemoryStore::new();
    let processor = InMemoryProcessor::new();
    let state = create_state(store.clone(), processor.clone(), config);
    (state, store, processor)
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, P>(state: Arc<AppState<S, P>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/register", post(routes::auth::register::<S, P>))
        .route("/login", post(routes::auth::login::<S, P>))
        .route("/profile", get(routes::auth::profile::<S, P>))
        .route("/products", post(routes::products::create::<S, P>))
        .route("/products", get(routes::products::list::<S, P>))
        .route("/orders", post(routes::orders::create::<S, P>))
        .route("/orders", get(routes::orders::list::<S, P>))
        .route("/webhook", post(routes::webhook::handle::<S, P>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
