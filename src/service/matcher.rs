use crate::config::MergeStrategy;
use crate::models::{LedgerRecord, StockRecord};
use crate::service::normalize::normalize_size;
use std::collections::HashMap;

/// A ledger entry and the stock row joined to it, if any
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub ledger: &'a LedgerRecord,
    pub stock: Option<&'a StockRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchOutcome<'a> {
    pub pairs: Vec<MatchedPair<'a>>,
    /// Stock rows without a priced ledger entry; they are dropped by the merge
    pub unmatched_stock: usize,
}

impl MatchOutcome<'_> {
    pub fn matched(&self) -> usize {
        self.pairs.iter().filter(|p| p.stock.is_some()).count()
    }
}

/// Ledger entries whose bare-digit size contains the bare-digit query.
/// An empty query (after normalization) keeps everything.
pub fn filter_by_size<'a>(ledger: &'a [LedgerRecord], size_query: &str) -> Vec<&'a LedgerRecord> {
    let query = normalize_size(size_query);
    ledger
        .iter()
        .filter(|rec| query.is_empty() || normalize_size(&rec.size).contains(&query))
        .collect()
}

/// Codes join only when equal after trimming. Case is significant, unlike
/// brand comparison; blank codes never join.
fn join_key(code: &str) -> Option<&str> {
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Join ledger entries with stock rows.
///
/// Primary key is ledger code == stock unique code, falling back to the
/// stock's internal code. No fuzzy matching; the first candidate in
/// iteration order wins. Unpriced ledger entries never take stock, since
/// the merge drops them anyway.
pub fn match_records<'a>(
    ledger: &[&'a LedgerRecord],
    stock: &'a [StockRecord],
    strategy: MergeStrategy,
) -> MatchOutcome<'a> {
    match strategy {
        MergeStrategy::LedgerDriven => match_ledger_driven(ledger, stock),
        MergeStrategy::StockDriven => match_stock_driven(ledger, stock),
    }
}

/// Every ledger entry looks up its first matching stock row
fn match_ledger_driven<'a>(ledger: &[&'a LedgerRecord], stock: &'a [StockRecord]) -> MatchOutcome<'a> {
    let mut by_unique: HashMap<&str, usize> = HashMap::new();
    let mut by_internal: HashMap<&str, usize> = HashMap::new();
    for (idx, rec) in stock.iter().enumerate() {
        if let Some(code) = join_key(&rec.unique_code) {
            by_unique.entry(code).or_insert(idx);
        }
        if let Some(code) = join_key(&rec.internal_code) {
            by_internal.entry(code).or_insert(idx);
        }
    }

    let mut used = vec![false; stock.len()];
    let pairs = ledger
        .iter()
        .map(|&entry| {
            let hit = join_key(&entry.code).filter(|_| priced(entry)).and_then(|code| {
                by_unique
                    .get(code)
                    .or_else(|| by_internal.get(code))
                    .copied()
            });
            if let Some(idx) = hit {
                used[idx] = true;
            }
            MatchedPair {
                ledger: entry,
                stock: hit.map(|idx| &stock[idx]),
            }
        })
        .collect();

    MatchOutcome {
        pairs,
        unmatched_stock: used.iter().filter(|u| !**u).count(),
    }
}

/// Every stock row claims the first unclaimed ledger entry with its code;
/// ledger entries left over follow with zero stock
fn match_stock_driven<'a>(ledger: &[&'a LedgerRecord], stock: &'a [StockRecord]) -> MatchOutcome<'a> {
    let mut by_code: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, entry) in ledger.iter().enumerate().filter(|(_, e)| priced(e)) {
        if let Some(code) = join_key(&entry.code) {
            by_code.entry(code).or_default().push(idx);
        }
    }

    let mut claimed = vec![false; ledger.len()];
    let mut pairs = Vec::with_capacity(ledger.len());
    let mut unmatched_stock = 0;

    for rec in stock {
        let hit = first_free(&by_code, &claimed, join_key(&rec.unique_code))
            .or_else(|| first_free(&by_code, &claimed, join_key(&rec.internal_code)));

        match hit {
            Some(idx) => {
                claimed[idx] = true;
                pairs.push(MatchedPair {
                    ledger: ledger[idx],
                    stock: Some(rec),
                });
            }
            None => unmatched_stock += 1,
        }
    }

    for (idx, &entry) in ledger.iter().enumerate() {
        if !claimed[idx] {
            pairs.push(MatchedPair { ledger: entry, stock: None });
        }
    }

    MatchOutcome {
        pairs,
        unmatched_stock,
    }
}

fn priced(entry: &LedgerRecord) -> bool {
    entry.factory_price > 0
}

fn first_free(by_code: &HashMap<&str, Vec<usize>>, claimed: &[bool], code: Option<&str>) -> Option<usize> {
    by_code
        .get(code?)
        .and_then(|positions| positions.iter().copied().find(|&p| !claimed[p]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(code: &str, size: &str) -> LedgerRecord {
        LedgerRecord {
            brand: "Hankook".into(),
            model: "Ventus".into(),
            size: size.into(),
            code: code.into(),
            factory_price: 100_000,
            dots: vec![],
            store_stock: 0,
            reorder_point: None,
            category: String::new(),
            season: String::new(),
        }
    }

    fn stock(unique: &str, internal: &str, qty: i64) -> StockRecord {
        StockRecord {
            brand: "Hankook".into(),
            model: "Ventus".into(),
            internal_code: internal.into(),
            size: "245/45R18 98W".into(),
            unique_code: unique.into(),
            supply_price: 0,
            stock: qty,
            discontinued: false,
        }
    }

    #[test]
    fn exact_code_match_after_trim() {
        let l = vec![ledger("AB12", "245/45R18")];
        let s = vec![stock(" AB12 ", "", 3)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::LedgerDriven);
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(3));
    }

    #[test]
    fn code_comparison_is_case_sensitive() {
        let l = vec![ledger("AB12", "245/45R18")];
        let s = vec![stock(" ab12 ", "", 3)];
        let refs: Vec<_> = l.iter().collect();
        for strategy in [MergeStrategy::LedgerDriven, MergeStrategy::StockDriven] {
            let out = match_records(&refs, &s, strategy);
            assert_eq!(out.matched(), 0);
            assert_eq!(out.unmatched_stock, 1);
        }
    }

    #[test]
    fn falls_back_to_internal_code() {
        let l = vec![ledger("HK-77", "245/45R18")];
        let s = vec![stock("ZZ", "HK-77", 5)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::LedgerDriven);
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(5));
        let out = match_records(&refs, &s, MergeStrategy::StockDriven);
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(5));
    }

    #[test]
    fn unique_code_beats_earlier_internal_code() {
        let l = vec![ledger("AB12", "245/45R18")];
        let s = vec![stock("X", "AB12", 1), stock("AB12", "", 2)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::LedgerDriven);
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(2));
    }

    #[test]
    fn first_stock_row_wins_ties() {
        let l = vec![ledger("AB12", "245/45R18")];
        let s = vec![stock("AB12", "", 1), stock("AB12", "", 2)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::LedgerDriven);
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(1));
        assert_eq!(out.unmatched_stock, 1);
    }

    #[test]
    fn blank_codes_never_match() {
        let l = vec![ledger("", "245/45R18")];
        let s = vec![stock("", "", 1)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::StockDriven);
        assert_eq!(out.matched(), 0);
        assert_eq!(out.pairs.len(), 1);
    }

    #[test]
    fn stock_driven_claims_each_ledger_once() {
        let l = vec![ledger("AB12", "245/45R18"), ledger("CD34", "205/55R16")];
        let s = vec![stock("AB12", "", 1), stock("AB12", "", 2), stock("EF56", "", 3)];
        let refs: Vec<_> = l.iter().collect();
        let out = match_records(&refs, &s, MergeStrategy::StockDriven);
        assert_eq!(out.pairs.len(), 2);
        assert_eq!(out.pairs[0].ledger.code, "AB12");
        assert_eq!(out.pairs[0].stock.map(|r| r.stock), Some(1));
        assert_eq!(out.pairs[1].ledger.code, "CD34");
        assert!(out.pairs[1].stock.is_none());
        assert_eq!(out.unmatched_stock, 2);
    }

    #[test]
    fn size_filter_uses_substring_of_digits() {
        let l = vec![
            ledger("A", "245/45R18"),
            ledger("B", "245/45ZR18 XL"),
            ledger("C", "205/55R16"),
        ];
        let hits: Vec<_> = filter_by_size(&l, "2454518").iter().map(|r| r.code.clone()).collect();
        assert_eq!(hits, vec!["A", "B"]);
        assert_eq!(filter_by_size(&l, "245").len(), 2);
        assert_eq!(filter_by_size(&l, "").len(), 3);
    }

    #[test]
    fn unpriced_duplicates_do_not_take_stock() {
        let mut unpriced = ledger("AB12", "245/45R18");
        unpriced.factory_price = 0;
        let l = vec![unpriced, ledger("AB12", "245/45R18")];
        let s = vec![stock("AB12", "", 8)];
        let refs: Vec<_> = l.iter().collect();
        for strategy in [MergeStrategy::LedgerDriven, MergeStrategy::StockDriven] {
            let out = match_records(&refs, &s, strategy);
            let priced: Vec<_> = out.pairs.iter().filter(|p| p.ledger.factory_price > 0).collect();
            assert_eq!(priced.len(), 1);
            assert_eq!(priced[0].stock.map(|r| r.stock), Some(8), "{:?}", strategy);
            assert_eq!(out.matched(), 1);
            assert_eq!(out.unmatched_stock, 0);
        }
    }

    #[test]
    fn stock_behind_unpriced_entry_counts_as_unmatched() {
        let mut unpriced = ledger("PS71", "245/45R18");
        unpriced.factory_price = 0;
        let l = vec![unpriced];
        let s = vec![stock("PS71", "", 10)];
        let refs: Vec<_> = l.iter().collect();
        for strategy in [MergeStrategy::LedgerDriven, MergeStrategy::StockDriven] {
            let out = match_records(&refs, &s, strategy);
            assert_eq!(out.matched(), 0);
            assert_eq!(out.unmatched_stock, 1);
        }
    }
}
