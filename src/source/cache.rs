use crate::models::LedgerRecord;
use crate::source::ledger::LedgerSource;
use crate::source::fetch_ledger_or_empty;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Snapshot {
    records: Arc<Vec<LedgerRecord>>,
    fetched_at: DateTime<Utc>,
}

/// Session cache in front of the ledger source.
/// Serves the last good snapshot until it ages past the TTL or is invalidated;
/// failed fetches are never cached.
pub struct LedgerCache {
    source: Arc<dyn LedgerSource>,
    ttl: ChronoDuration,
    fetch_timeout: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl LedgerCache {
    pub fn new(source: Arc<dyn LedgerSource>, ttl: Duration, fetch_timeout: Duration) -> Self {
        Self {
            source,
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::zero()),
            fetch_timeout,
            snapshot: RwLock::new(None),
        }
    }

    pub async fn records(&self) -> Arc<Vec<LedgerRecord>> {
        if let Some(fresh) = self.fresh().await {
            return fresh;
        }

        let records = Arc::new(fetch_ledger_or_empty(self.source.as_ref(), self.fetch_timeout).await);
        if !records.is_empty() {
            *self.snapshot.write().await = Some(Snapshot {
                records: Arc::clone(&records),
                fetched_at: Utc::now(),
            });
            tracing::info!("Ledger cache refreshed: {} records", records.len());
        }
        records
    }

    async fn fresh(&self) -> Option<Arc<Vec<LedgerRecord>>> {
        let guard = self.snapshot.read().await;
        let snap = guard.as_ref()?;
        (Utc::now() - snap.fetched_at < self.ttl).then(|| Arc::clone(&snap.records))
    }

    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        tracing::info!("Ledger cache invalidated");
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.fetched_at)
    }
}
