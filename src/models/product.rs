use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable per-record identifier assigned at merge time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unified product view produced by the merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedProduct {
    pub id: ProductId,
    pub brand: String,
    pub model: String,
    pub size: String,
    pub code: String,
    pub internal_code: String,
    pub factory_price: i64,      // ledger only, always > 0
    pub supply_price: i64,       // stock feed, 0 when unmatched
    pub total_stock: i64,        // stock feed, 0 when unmatched
    pub store_stock: i64,        // ledger
    pub reorder_point: i64,
    pub discount_rate: BigDecimal,
    pub dots: Vec<String>,
    pub category: String,
    pub season: String,
}

impl MergedProduct {
    pub fn discounted_price(&self) -> i64 {
        discounted_price(self.factory_price, &self.discount_rate)
    }

    pub fn stock_for(&self, source: OrderSource) -> i64 {
        match source {
            OrderSource::Store => self.store_stock,
            OrderSource::Supplier => self.total_stock,
        }
    }

    fn stock_for_mut(&mut self, source: OrderSource) -> &mut i64 {
        match source {
            OrderSource::Store => &mut self.store_stock,
            OrderSource::Supplier => &mut self.total_stock,
        }
    }

    /// Decrement stock for an order; untouched on failure.
    /// Returns the remaining quantity.
    pub fn take_stock(&mut self, quantity: i64, source: OrderSource) -> Result<i64, i64> {
        let available = self.stock_for(source);
        if quantity > available {
            return Err(available);
        }
        let slot = self.stock_for_mut(source);
        *slot -= quantity;
        Ok(*slot)
    }
}

/// floor(factory_price * (1 - rate / 100)), truncated toward zero.
/// No clamping here; edits are validated at the store boundary.
pub fn discounted_price(factory_price: i64, discount_rate: &BigDecimal) -> i64 {
    let hundred = BigDecimal::from(100);
    let scaled = BigDecimal::from(factory_price) * (&hundred - discount_rate) / hundred;
    scaled.with_scale(0).to_i64().unwrap_or(0)
}

/// Clamp a user-entered discount rate into [0, 100]
pub fn clamp_discount_rate(rate: BigDecimal) -> BigDecimal {
    let hundred = BigDecimal::from(100);
    if rate < BigDecimal::zero() {
        BigDecimal::zero()
    } else if rate > hundred {
        hundred
    } else {
        rate
    }
}

/// Which stock pool an order draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Store,
    Supplier,
}

/// Advisory signal raised when an order leaves stock at or below the reorder point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: ProductId,
    pub brand: String,
    pub model: String,
    pub size: String,
    pub source: OrderSource,
    pub remaining: i64,
    pub reorder_point: i64,
    pub raised_at: DateTime<Utc>,
}

/// Outcome of a successful order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub product_id: ProductId,
    pub quantity: i64,
    pub source: OrderSource,
    pub remaining: i64,
    pub low_stock: Option<LowStockAlert>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn discount_truncates() {
        assert_eq!(discounted_price(100_000, &BigDecimal::from(15)), 85_000);
        assert_eq!(discounted_price(99_999, &BigDecimal::from(10)), 89_999);
        assert_eq!(discounted_price(1_000, &BigDecimal::from_str("33.3").unwrap()), 667);
        assert_eq!(discounted_price(1_000, &BigDecimal::zero()), 1_000);
    }

    #[test]
    fn discount_does_not_clamp() {
        assert_eq!(discounted_price(1_000, &BigDecimal::from(150)), -500);
        assert_eq!(discounted_price(1_000, &BigDecimal::from(-10)), 1_100);
    }

    #[test]
    fn clamp_bounds_rate() {
        assert_eq!(clamp_discount_rate(BigDecimal::from(-5)), BigDecimal::zero());
        assert_eq!(clamp_discount_rate(BigDecimal::from(120)), BigDecimal::from(100));
        assert_eq!(clamp_discount_rate(BigDecimal::from(20)), BigDecimal::from(20));
    }
}
