pub mod cache;
pub mod ledger;
pub mod stock;

pub use cache::LedgerCache;
pub use ledger::{parse_ledger_csv, CsvLedgerSource, LedgerSource};
pub use stock::{FileStockSource, HttpStockSource, StockSource};

use crate::error::SourceError;
use crate::models::LedgerRecord;
use std::future::Future;
use std::time::Duration;

/// Bound a fetch by the timeout; any failure degrades to `None` with a warning
async fn fetch_within<T, F>(what: &str, timeout: Duration, fetch: F) -> Option<T>
where
    F: Future<Output = Result<T, SourceError>>,
{
    let result = match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(timeout)),
    };
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{} unavailable, continuing with empty result: {}", what, e);
            None
        }
    }
}

/// Stock document, or "" when the feed fails or times out
pub async fn fetch_stock_or_empty(source: &dyn StockSource, size_query: &str, timeout: Duration) -> String {
    fetch_within("Stock feed", timeout, source.fetch_stock_document(size_query))
        .await
        .unwrap_or_default()
}

/// Ledger records, or none when the ledger fails or times out
pub async fn fetch_ledger_or_empty(source: &dyn LedgerSource, timeout: Duration) -> Vec<LedgerRecord> {
    fetch_within("Ledger", timeout, source.fetch_ledger_records())
        .await
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Stalled;

    #[async_trait]
    impl StockSource for Stalled {
        async fn fetch_stock_document(&self, _size_query: &str) -> Result<String, SourceError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("<table></table>".to_string())
        }
    }

    #[test]
    fn sub_second_timeouts_keep_their_unit() {
        let err = SourceError::Timeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Fetch timed out after 200ms");
    }

    #[tokio::test]
    async fn stalled_feed_degrades_to_empty_document() {
        let doc = fetch_stock_or_empty(&Stalled, "245/45R18", Duration::from_millis(50)).await;
        assert!(doc.is_empty());
    }
}
