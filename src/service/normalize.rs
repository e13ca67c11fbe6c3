use crate::config::BrandGroupConfig;
use crate::models::{LedgerRecord, RawLedgerRow};
use serde::Serialize;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Bare-digits form of a tire size: "245/45R18" -> "2454518"
pub fn normalize_size(size: &str) -> String {
    size.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonical brand key: lowercase, without whitespace or ASCII punctuation
pub fn normalize_brand(brand: &str) -> String {
    brand
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Numeric field extraction: all non-digits stripped, 0 when nothing is left
pub fn parse_digits(text: &str) -> i64 {
    normalize_size(text).parse().unwrap_or(0)
}

fn parse_optional_digits(text: &str) -> Option<i64> {
    let digits = normalize_size(text);
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Split a DOT cell ("2423, 0124;3523") keeping first-seen order
pub fn split_dots(cell: &str) -> Vec<String> {
    let dots: IndexSet<&str> = cell
        .split(|c: char| c == ',' || c == ';' || c == '/' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    dots.into_iter().map(str::to_string).collect()
}

/// Raw price-sheet row -> ledger record
pub fn normalize_ledger_row(raw: RawLedgerRow) -> LedgerRecord {
    LedgerRecord {
        brand: raw.brand.trim().to_string(),
        model: raw.model.trim().to_string(),
        size: raw.size.trim().to_string(),
        code: raw.code.trim().to_string(),
        factory_price: parse_digits(&raw.factory_price),
        dots: split_dots(&raw.dot),
        store_stock: parse_digits(&raw.store_stock),
        reorder_point: parse_optional_digits(&raw.reorder_point),
        category: raw.category.trim().to_string(),
        season: raw.season.trim().to_string(),
    }
}

/// Brands shown under one filter entry
#[derive(Debug, Clone, Serialize)]
pub struct BrandGroup {
    pub key: String,
    pub display: String,
    pub aliases: Vec<String>,
}

impl BrandGroup {
    pub fn new(display: &str, aliases: &[&str]) -> Self {
        Self {
            key: normalize_brand(display),
            display: display.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl From<&BrandGroupConfig> for BrandGroup {
    fn from(cfg: &BrandGroupConfig) -> Self {
        Self {
            key: normalize_brand(&cfg.display),
            display: cfg.display.trim().to_string(),
            aliases: cfg.aliases.clone(),
        }
    }
}

/// Canonical brand key <-> display name lookup
#[derive(Debug, Clone)]
pub struct BrandCatalog {
    groups: Vec<BrandGroup>,
    /// canonical alias -> index into `groups`
    index: HashMap<String, usize>,
}

impl BrandCatalog {
    pub fn new(groups: Vec<BrandGroup>) -> Self {
        let mut index = HashMap::new();
        for (idx, group) in groups.iter().enumerate() {
            index.insert(group.key.clone(), idx);
            for alias in &group.aliases {
                index.entry(normalize_brand(alias)).or_insert(idx);
            }
        }
        Self { groups, index }
    }

    /// Group key for any spelling of a brand; unknown brands key to themselves
    pub fn group_key(&self, brand: &str) -> String {
        let canonical = normalize_brand(brand);
        match self.index.get(&canonical) {
            Some(&idx) => self.groups[idx].key.clone(),
            None => canonical,
        }
    }

    pub fn display_name(&self, brand: &str) -> String {
        match self.index.get(&normalize_brand(brand)) {
            Some(&idx) => self.groups[idx].display.clone(),
            None => brand.trim().to_string(),
        }
    }

    /// Configured groups, or the built-in ones when none are configured
    pub fn from_config(groups: &[BrandGroupConfig]) -> Self {
        if groups.is_empty() {
            Self::default()
        } else {
            Self::new(groups.iter().map(BrandGroup::from).collect())
        }
    }

    pub fn groups(&self) -> &[BrandGroup] {
        &self.groups
    }
}

impl Default for BrandCatalog {
    fn default() -> Self {
        Self::new(vec![
            BrandGroup::new("Hankook", &["한국", "한국타이어", "Laufenn", "라우펜"]),
            BrandGroup::new("Kumho", &["금호", "금호타이어"]),
            BrandGroup::new("Nexen", &["넥센", "넥센타이어"]),
            BrandGroup::new("Michelin", &["미쉐린", "미쉐린타이어"]),
            BrandGroup::new("Continental", &["콘티넨탈"]),
            BrandGroup::new("Pirelli", &["피렐리"]),
            BrandGroup::new("Bridgestone", &["브리지스톤"]),
            BrandGroup::new("Goodyear", &["굿이어"]),
        ])
    }
}
