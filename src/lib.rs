pub mod admin;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod provider;
pub mod security;
pub mod services;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::admin::AdminSink;
use crate::config::Config;
use crate::provider::PaymentProvider;
use crate::services::OrderLifecycle;
use crate::store::OrderStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn OrderStore>,
    pub provider: Arc<dyn PaymentProvider>,
    pub lifecycle: Arc<OrderLifecycle>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        admin: Arc<dyn AdminSink>,
    ) -> Self {
        let lifecycle = Arc::new(OrderLifecycle::new(
            store.clone(),
            provider.clone(),
            admin,
        ));
        Self {
            config,
            store,
            provider,
            lifecycle,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/checkout", post(handlers::checkout::create_order))
        .route("/api/checkout/:id", get(handlers::checkout::get_order))
        .route(
            "/api/checkout/:id/status",
            get(handlers::checkout::get_order_status),
        )
        .route(
            "/api/webhooks/payment",
            post(handlers::webhook::payment_webhook),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
