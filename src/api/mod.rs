pub mod handlers;

pub use handlers::*;

use crate::service::Reconciler;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// All routes over a shared reconciler
pub fn router(reconciler: Arc<Reconciler>) -> Router {
    let api_routes = Router::new()
        .route("/api/reconcile", post(reconcile))
        .route("/api/search", post(search))
        .route("/api/orders", post(place_order))
        .route("/api/products/:id", patch(update_product))
        .route("/api/ledger/invalidate", post(invalidate_ledger))
        .route("/api/alerts", get(alerts))
        .route("/api/brands", get(brands))
        .route("/api/sort", post(select_sort).delete(reset_sort))
        .with_state(reconciler);

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
}
