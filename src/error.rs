use crate::models::ProductId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Upstream fetch failure. Recovered locally as an empty result, never surfaced.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Fetch timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Order placement failures; the record is left untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Product {0} not found")]
    RecordNotFound(ProductId),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },
}

/// Session override failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("Product {0} not found")]
    RecordNotFound(ProductId),

    #[error("Factory price must be positive, got {0}")]
    NonPositivePrice(i64),
}

/// Errors reported by the HTTP surface
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Override(#[from] OverrideError),

    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Order(OrderError::RecordNotFound(_))
            | AppError::Override(OverrideError::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Order(OrderError::InsufficientStock { .. }) => StatusCode::CONFLICT,
            AppError::Override(OverrideError::NonPositivePrice(_)) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
