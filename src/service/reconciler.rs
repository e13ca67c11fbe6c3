use crate::config::{MergeStrategy, PipelineConfig};
use crate::error::{OrderError, OverrideError};
use crate::models::{
    LedgerRecord, LowStockAlert, MergedProduct, OrderReceipt, OrderSource, ProductId, SearchCriteria,
    SortKey, SortSpec, SortState,
};
use crate::service::dedup::dedup_stock;
use crate::service::matcher::{filter_by_size, match_records};
use crate::service::merge::merge_all;
use crate::service::normalize::BrandCatalog;
use crate::service::parser::{parse_stock_table, ParseOptions};
use crate::service::search::search;
use crate::service::store::ProductStore;
use crate::source::{fetch_stock_or_empty, LedgerCache, StockSource};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Pipeline settings consumed by `reconcile`
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub parse: ParseOptions,
    pub merge_strategy: MergeStrategy,
    pub default_reorder_point: i64,
}

impl From<&PipelineConfig> for ReconcileOptions {
    fn from(cfg: &PipelineConfig) -> Self {
        Self {
            parse: ParseOptions::from(cfg),
            merge_strategy: cfg.merge_strategy,
            default_reorder_point: cfg.default_reorder_point,
        }
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

/// Per-cycle counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub parsed_rows: usize,
    pub malformed_rows: usize,
    pub discontinued_rows: usize,
    pub unique_stock: usize,
    pub ledger_candidates: usize,
    pub matched: usize,
    pub dropped_stock: usize,
    pub products: usize,
}

/// Pure pipeline: parse, dedup, size-filter, match, merge
pub fn reconcile_with_stats(
    options: &ReconcileOptions,
    size_query: &str,
    stock_document: &str,
    ledger: &[LedgerRecord],
) -> (Vec<MergedProduct>, ReconcileStats) {
    // 1. stock document -> records
    let parsed = parse_stock_table(stock_document, &options.parse);
    let parsed_rows = parsed.records.len();

    // 2. dedup
    let stock = dedup_stock(parsed.records);

    // 3. ledger candidates for this size
    let candidates = filter_by_size(ledger, size_query);

    // 4. join
    let outcome = match_records(&candidates, &stock, options.merge_strategy);

    // 5. merge with price gate
    let products = merge_all(&outcome.pairs, options.default_reorder_point);

    let stats = ReconcileStats {
        parsed_rows,
        malformed_rows: parsed.malformed,
        discontinued_rows: parsed.discontinued,
        unique_stock: stock.len(),
        ledger_candidates: candidates.len(),
        matched: outcome.matched(),
        dropped_stock: outcome.unmatched_stock,
        products: products.len(),
    };
    (products, stats)
}

pub fn reconcile(
    options: &ReconcileOptions,
    size_query: &str,
    stock_document: &str,
    ledger: &[LedgerRecord],
) -> Vec<MergedProduct> {
    reconcile_with_stats(options, size_query, stock_document, ledger).0
}

/// Owns the sources, the ledger cache and the session store
pub struct Reconciler {
    stock_source: Arc<dyn StockSource>,
    ledger: LedgerCache,
    options: ReconcileOptions,
    stock_timeout: Duration,
    catalog: BrandCatalog,
    store: ProductStore,
    sort: Mutex<SortState>,
}

impl Reconciler {
    pub fn new(
        stock_source: Arc<dyn StockSource>,
        ledger: LedgerCache,
        options: ReconcileOptions,
        stock_timeout: Duration,
    ) -> Self {
        Self {
            stock_source,
            ledger,
            options,
            stock_timeout,
            catalog: BrandCatalog::default(),
            store: ProductStore::new(),
            sort: Mutex::new(SortState::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: BrandCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// One fetch cycle: both sources concurrently, then merge from scratch
    pub async fn refresh(&self, size_query: &str) -> ReconcileStats {
        let (document, ledger) = futures::join!(
            fetch_stock_or_empty(self.stock_source.as_ref(), size_query, self.stock_timeout),
            self.ledger.records(),
        );

        let (products, stats) = reconcile_with_stats(&self.options, size_query, &document, &ledger);
        self.store.replace(products);

        tracing::info!(
            "Reconciled '{}': {} stock rows ({} unique), {} ledger candidates, {} matched, {} dropped, {} products",
            size_query,
            stats.parsed_rows,
            stats.unique_stock,
            stats.ledger_candidates,
            stats.matched,
            stats.dropped_stock,
            stats.products
        );
        stats
    }

    /// Filter and sort the session products. Without an explicit sort the
    /// session's column selection applies, then recommendation order.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<MergedProduct> {
        let criteria = SearchCriteria {
            sort: criteria.sort.or_else(|| self.sort_state().current()),
            ..criteria.clone()
        };
        search(&self.store.snapshot(), &criteria, &self.catalog)
    }

    fn sort_state(&self) -> std::sync::MutexGuard<'_, SortState> {
        self.sort.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Column-header click: same key flips direction
    pub fn select_sort(&self, key: SortKey) -> SortSpec {
        self.sort_state().select(key)
    }

    /// Back to recommendation order
    pub fn reset_sort(&self) {
        self.sort_state().reset();
    }

    pub fn products(&self) -> Vec<MergedProduct> {
        self.store.snapshot()
    }

    pub fn product(&self, id: ProductId) -> Option<MergedProduct> {
        self.store.get(id)
    }

    pub fn apply_order(&self, id: ProductId, quantity: u32, source: OrderSource) -> Result<OrderReceipt, OrderError> {
        self.store.apply_order(id, quantity, source)
    }

    pub fn set_discount_rate(&self, id: ProductId, rate: BigDecimal) -> Result<MergedProduct, OverrideError> {
        self.store.set_discount_rate(id, rate)
    }

    pub fn set_factory_price(&self, id: ProductId, price: i64) -> Result<MergedProduct, OverrideError> {
        self.store.set_factory_price(id, price)
    }

    pub fn alerts(&self) -> Vec<LowStockAlert> {
        self.store.alerts()
    }

    pub async fn invalidate_ledger(&self) {
        self.ledger.invalidate().await;
    }

    pub fn catalog(&self) -> &BrandCatalog {
        &self.catalog
    }
}
