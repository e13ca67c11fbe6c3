use crate::models::{MergedProduct, ProductId};
use crate::service::matcher::MatchedPair;
use bigdecimal::{BigDecimal, Zero};

fn prefer<'a>(primary: &'a str, fallback: Option<&'a str>) -> &'a str {
    let primary = primary.trim();
    if primary.is_empty() {
        fallback.map(str::trim).unwrap_or_default()
    } else {
        primary
    }
}

/// Apply field-priority rules to one joined pair.
/// Returns None when the ledger carries no usable factory price.
pub fn merge_pair(pair: &MatchedPair<'_>, id: ProductId, default_reorder_point: i64) -> Option<MergedProduct> {
    let ledger = pair.ledger;
    if ledger.factory_price <= 0 {
        return None;
    }
    let stock = pair.stock;

    // size: stock row is more detailed when matched
    let size = match stock {
        Some(s) => prefer(&s.size, Some(ledger.size.as_str())),
        None => ledger.size.trim(),
    };

    Some(MergedProduct {
        id,
        brand: prefer(&ledger.brand, stock.map(|s| s.brand.as_str())).to_string(),
        model: prefer(&ledger.model, stock.map(|s| s.model.as_str())).to_string(),
        size: size.to_string(),
        code: prefer(&ledger.code, stock.map(|s| s.unique_code.as_str())).to_string(),
        internal_code: stock.map(|s| s.internal_code.clone()).unwrap_or_default(),
        factory_price: ledger.factory_price,
        supply_price: stock.map_or(0, |s| s.supply_price),
        total_stock: stock.map_or(0, |s| s.stock),
        store_stock: ledger.store_stock,
        reorder_point: ledger.reorder_point.unwrap_or(default_reorder_point),
        discount_rate: BigDecimal::zero(),
        dots: ledger.dots.clone(),
        category: ledger.category.clone(),
        season: ledger.season.clone(),
    })
}

/// Merge every pair, dropping unpriced ones; ids follow output order
pub fn merge_all(pairs: &[MatchedPair<'_>], default_reorder_point: i64) -> Vec<MergedProduct> {
    let mut next_id = 1u64;
    pairs
        .iter()
        .filter_map(|pair| {
            let product = merge_pair(pair, ProductId(next_id), default_reorder_point)?;
            next_id += 1;
            Some(product)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LedgerRecord, StockRecord};

    fn ledger(price: i64) -> LedgerRecord {
        LedgerRecord {
            brand: "Hankook".into(),
            model: "".into(),
            size: "245/45R18".into(),
            code: "AB12".into(),
            factory_price: price,
            dots: vec!["2423".into()],
            store_stock: 4,
            reorder_point: None,
            category: "SUV".into(),
            season: "Summer".into(),
        }
    }

    fn stock() -> StockRecord {
        StockRecord {
            brand: "HANKOOK".into(),
            model: "Ventus S1 evo3".into(),
            internal_code: "HK-1".into(),
            size: "245/45ZR18 100Y XL".into(),
            unique_code: "AB12".into(),
            supply_price: 90_000,
            stock: 12,
            discontinued: false,
        }
    }

    #[test]
    fn matched_pair_takes_fields_by_priority() {
        let l = ledger(150_000);
        let s = stock();
        let p = merge_pair(&MatchedPair { ledger: &l, stock: Some(&s) }, ProductId(1), 2).unwrap();
        assert_eq!(p.brand, "Hankook");
        assert_eq!(p.model, "Ventus S1 evo3");
        assert_eq!(p.size, "245/45ZR18 100Y XL");
        assert_eq!(p.factory_price, 150_000);
        assert_eq!(p.supply_price, 90_000);
        assert_eq!(p.total_stock, 12);
        assert_eq!(p.store_stock, 4);
        assert_eq!(p.reorder_point, 2);
        assert_eq!(p.dots, vec!["2423"]);
        assert_eq!(p.discount_rate, BigDecimal::zero());
    }

    #[test]
    fn unmatched_ledger_surfaces_with_zero_stock() {
        let l = ledger(150_000);
        let p = merge_pair(&MatchedPair { ledger: &l, stock: None }, ProductId(1), 2).unwrap();
        assert_eq!(p.size, "245/45R18");
        assert_eq!(p.total_stock, 0);
        assert_eq!(p.supply_price, 0);
        assert_eq!(p.internal_code, "");
    }

    #[test]
    fn unpriced_entries_are_gated_out() {
        let priced = ledger(1);
        let free = ledger(0);
        let pairs = [
            MatchedPair { ledger: &free, stock: None },
            MatchedPair { ledger: &priced, stock: None },
        ];
        let merged = merge_all(&pairs, 2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, ProductId(1));
        assert!(merged.iter().all(|p| p.factory_price > 0));
    }
}
