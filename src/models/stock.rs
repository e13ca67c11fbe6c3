use serde::{Deserialize, Serialize};

/// Stock row scraped from the supplier portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub brand: String,
    pub model: String,
    pub internal_code: String,   // supplier's own item code
    pub size: String,
    pub unique_code: String,     // cross-source join key, may be empty
    pub supply_price: i64,
    pub stock: i64,
    pub discontinued: bool,
}

/// Dedup identity: (brand, model, size, unique_code), trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockKey {
    brand: String,
    model: String,
    size: String,
    unique_code: String,
}

impl StockRecord {
    pub fn key(&self) -> StockKey {
        StockKey {
            brand: key_part(&self.brand),
            model: key_part(&self.model),
            size: key_part(&self.size),
            unique_code: key_part(&self.unique_code),
        }
    }

    /// Blank or all-zero unique codes count as missing
    pub fn has_unique_code(&self) -> bool {
        let code = self.unique_code.trim();
        !code.is_empty() && code.chars().any(|c| c != '0')
    }
}

fn key_part(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
