use serde::{Deserialize, Serialize};

/// Raw ledger row as it appears in the price sheet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLedgerRow {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub factory_price: String,
    #[serde(default)]
    pub dot: String,
    #[serde(default)]
    pub store_stock: String,
    #[serde(default)]
    pub reorder_point: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub season: String,
}

/// Normalized ledger entry: authoritative price and DOT data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub brand: String,
    pub model: String,
    pub size: String,
    pub code: String,
    pub factory_price: i64,
    pub dots: Vec<String>,
    pub store_stock: i64,
    pub reorder_point: Option<i64>,   // None: use the configured default
    pub category: String,
    pub season: String,
}
