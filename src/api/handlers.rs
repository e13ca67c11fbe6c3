use crate::error::{AppError, OverrideError};
use crate::models::{
    LowStockAlert, MergedProduct, OrderReceipt, OrderSource, ProductId, SearchCriteria, SortKey, SortSpec,
};
use crate::service::{BrandGroup, ReconcileStats, Reconciler};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: size to look up
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub size_query: String,
}

/// Response body with cycle statistics
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub message: String,
    pub stats: ReconcileStats,
    pub products: Vec<MergedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub source: OrderSource,
}

/// Session-only overrides from the quoting screen
#[derive(Debug, Deserialize)]
pub struct ProductPatch {
    pub discount_rate: Option<BigDecimal>,
    pub factory_price: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Fetch both sources and rebuild the product list
pub async fn reconcile(
    State(reconciler): State<Arc<Reconciler>>,
    Json(req): Json<ReconcileRequest>,
) -> Response {
    let stats = reconciler.refresh(&req.size_query).await;
    let response = ReconcileResponse {
        success: true,
        message: format!(
            "Reconciled {} products for '{}' ({} matched with stock)",
            stats.products, req.size_query, stats.matched
        ),
        stats,
        products: reconciler.products(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn search(
    State(reconciler): State<Arc<Reconciler>>,
    Json(criteria): Json<SearchCriteria>,
) -> Json<Vec<MergedProduct>> {
    Json(reconciler.search(&criteria))
}

pub async fn place_order(
    State(reconciler): State<Arc<Reconciler>>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderReceipt>, AppError> {
    if req.quantity == 0 {
        return Err(AppError::Validation("quantity must be at least 1".to_string()));
    }
    let receipt = reconciler.apply_order(req.product_id, req.quantity, req.source)?;
    Ok(Json(receipt))
}

pub async fn update_product(
    State(reconciler): State<Arc<Reconciler>>,
    Path(id): Path<u64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<MergedProduct>, AppError> {
    let id = ProductId(id);
    if patch.discount_rate.is_none() && patch.factory_price.is_none() {
        return Err(AppError::Validation("nothing to update".to_string()));
    }
    // price first, so a rejected price leaves the discount untouched
    if let Some(price) = patch.factory_price {
        reconciler.set_factory_price(id, price)?;
    }
    if let Some(rate) = patch.discount_rate {
        reconciler.set_discount_rate(id, rate)?;
    }
    let product = reconciler
        .product(id)
        .ok_or(OverrideError::RecordNotFound(id))?;
    Ok(Json(product))
}

pub async fn invalidate_ledger(State(reconciler): State<Arc<Reconciler>>) -> StatusCode {
    reconciler.invalidate_ledger().await;
    StatusCode::NO_CONTENT
}

pub async fn alerts(State(reconciler): State<Arc<Reconciler>>) -> Json<Vec<LowStockAlert>> {
    Json(reconciler.alerts())
}

pub async fn brands(State(reconciler): State<Arc<Reconciler>>) -> Json<Vec<BrandGroup>> {
    Json(reconciler.catalog().groups().to_vec())
}

/// Select a sort column for later searches; repeating a key flips direction
pub async fn select_sort(
    State(reconciler): State<Arc<Reconciler>>,
    Json(req): Json<SortRequest>,
) -> Json<SortSpec> {
    Json(reconciler.select_sort(req.key))
}

pub async fn reset_sort(State(reconciler): State<Arc<Reconciler>>) -> StatusCode {
    reconciler.reset_sort();
    StatusCode::NO_CONTENT
}
