use crate::models::StockRecord;
use indexmap::IndexMap;

/// Drop repeated stock rows by (brand, model, size, unique code).
/// First occurrence wins and keeps its position.
pub fn dedup_stock(records: Vec<StockRecord>) -> Vec<StockRecord> {
    let mut unique = IndexMap::with_capacity(records.len());
    for record in records {
        unique.entry(record.key()).or_insert(record);
    }
    unique.into_values().collect()
}
