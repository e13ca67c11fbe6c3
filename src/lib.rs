pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod source;

pub use config::AppConfig;
pub use error::{AppError, OrderError, OverrideError, SourceError};
pub use service::{reconcile, Reconciler};
