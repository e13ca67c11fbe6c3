pub mod ledger;
pub mod product;
pub mod search;
pub mod stock;

pub use ledger::{LedgerRecord, RawLedgerRow};
pub use product::{
    clamp_discount_rate, discounted_price, LowStockAlert, MergedProduct, OrderReceipt,
    OrderSource, ProductId,
};
pub use search::{SearchCriteria, SortDirection, SortKey, SortSpec, SortState, ALL};
pub use stock::{StockKey, StockRecord};
