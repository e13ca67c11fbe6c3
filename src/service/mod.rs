pub mod dedup;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod reconciler;
pub mod search;
pub mod store;

pub use dedup::dedup_stock;
pub use matcher::{filter_by_size, match_records, MatchOutcome, MatchedPair};
pub use merge::{merge_all, merge_pair};
pub use normalize::{normalize_brand, normalize_size, BrandCatalog, BrandGroup};
pub use parser::{parse_stock_document, parse_stock_table, ParseOptions};
pub use reconciler::{reconcile, reconcile_with_stats, ReconcileOptions, ReconcileStats, Reconciler};
pub use store::ProductStore;
