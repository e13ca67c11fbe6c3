use crate::models::{MergedProduct, SearchCriteria, SortDirection, SortKey, SortSpec, ALL};
use crate::service::normalize::BrandCatalog;
use std::cmp::Ordering;

fn active(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case(ALL))
}

/// Free text hits size, model or brand, case-insensitively
fn matches_query(product: &MergedProduct, query: &str) -> bool {
    let query = query.to_lowercase();
    [&product.size, &product.model, &product.brand]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

pub fn matches(product: &MergedProduct, criteria: &SearchCriteria, catalog: &BrandCatalog) -> bool {
    if let Some(query) = active(&criteria.query) {
        if !matches_query(product, query) {
            return false;
        }
    }
    if let Some(brand) = active(&criteria.brand) {
        if catalog.group_key(&product.brand) != catalog.group_key(brand) {
            return false;
        }
    }
    if let Some(category) = active(&criteria.category) {
        if product.category != category {
            return false;
        }
    }
    if let Some(season) = active(&criteria.season) {
        if product.season != season {
            return false;
        }
    }
    true
}

fn compare_by(a: &MergedProduct, b: &MergedProduct, key: SortKey, catalog: &BrandCatalog) -> Ordering {
    match key {
        SortKey::Brand => catalog.display_name(&a.brand).cmp(&catalog.display_name(&b.brand)),
        SortKey::Model => a.model.cmp(&b.model),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::FactoryPrice => a.factory_price.cmp(&b.factory_price),
        SortKey::DiscountedPrice => a.discounted_price().cmp(&b.discounted_price()),
        SortKey::SupplyPrice => a.supply_price.cmp(&b.supply_price),
        SortKey::TotalStock => a.total_stock.cmp(&b.total_stock),
        SortKey::StoreStock => a.store_stock.cmp(&b.store_stock),
    }
}

/// Stable sort; None means recommendation order
/// (store stock descending, then discounted price ascending)
pub fn sort_products(products: &mut [MergedProduct], sort: Option<SortSpec>, catalog: &BrandCatalog) {
    match sort {
        Some(spec) => products.sort_by(|a, b| {
            let ord = compare_by(a, b, spec.key, catalog);
            match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }),
        None => products.sort_by(|a, b| {
            b.store_stock
                .cmp(&a.store_stock)
                .then_with(|| a.discounted_price().cmp(&b.discounted_price()))
        }),
    }
}

/// Filter then order
pub fn search(products: &[MergedProduct], criteria: &SearchCriteria, catalog: &BrandCatalog) -> Vec<MergedProduct> {
    let mut hits: Vec<MergedProduct> = products
        .iter()
        .filter(|p| matches(p, criteria, catalog))
        .cloned()
        .collect();
    sort_products(&mut hits, criteria.sort, catalog);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;
    use bigdecimal::{BigDecimal, Zero};

    fn product(id: u64, brand: &str, size: &str, store_stock: i64, price: i64) -> MergedProduct {
        MergedProduct {
            id: ProductId(id),
            brand: brand.into(),
            model: format!("Model {id}"),
            size: size.into(),
            code: format!("C{id}"),
            internal_code: String::new(),
            factory_price: price,
            supply_price: 0,
            total_stock: store_stock * 2,
            store_stock,
            reorder_point: 2,
            discount_rate: BigDecimal::zero(),
            dots: vec![],
            category: "Sedan".into(),
            season: if id % 2 == 0 { "Winter".into() } else { "Summer".into() },
        }
    }

    fn ids(products: &[MergedProduct]) -> Vec<u64> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn recommendation_order_prefers_stock_then_price() {
        let mut items = vec![
            product(1, "Hankook", "A", 5, 100),
            product(2, "Hankook", "A", 5, 50),
            product(3, "Hankook", "A", 10, 200),
        ];
        sort_products(&mut items, None, &BrandCatalog::default());
        let pairs: Vec<(i64, i64)> = items.iter().map(|p| (p.store_stock, p.factory_price)).collect();
        assert_eq!(pairs, vec![(10, 200), (5, 50), (5, 100)]);
    }

    #[test]
    fn sorting_twice_is_stable() {
        let spec = Some(SortSpec { key: SortKey::TotalStock, direction: SortDirection::Desc });
        let catalog = BrandCatalog::default();
        let mut items = vec![
            product(1, "Kumho", "A", 3, 1),
            product(2, "Kumho", "A", 7, 1),
            product(3, "Kumho", "A", 3, 1),
            product(4, "Kumho", "A", 7, 1),
        ];
        sort_products(&mut items, spec, &catalog);
        assert_eq!(ids(&items), vec![2, 4, 1, 3]);
        let before = items.clone();
        sort_products(&mut items, spec, &catalog);
        assert_eq!(items, before);
    }

    #[test]
    fn brand_sort_uses_display_name() {
        let catalog = BrandCatalog::default();
        let mut items = vec![
            product(1, "넥센", "A", 1, 1),      // Nexen
            product(2, "Laufenn", "A", 1, 1),   // Hankook
            product(3, "금호", "A", 1, 1),      // Kumho
        ];
        let spec = Some(SortSpec { key: SortKey::Brand, direction: SortDirection::Asc });
        sort_products(&mut items, spec, &catalog);
        assert_eq!(ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn filters_combine_with_and() {
        let catalog = BrandCatalog::default();
        let items = vec![
            product(1, "Hankook", "245/45R18", 1, 1),
            product(2, "Laufenn", "245/45R18", 1, 1),
            product(3, "Kumho", "245/45R18", 1, 1),
            product(4, "Hankook", "205/55R16", 1, 1),
        ];

        let by_group = SearchCriteria { brand: Some("한국".into()), ..Default::default() };
        assert_eq!(ids(&search(&items, &by_group, &catalog)).len(), 3);

        let narrowed = SearchCriteria {
            query: Some("245/45".into()),
            brand: Some("Hankook".into()),
            season: Some("Winter".into()),
            category: Some(ALL.into()),
            sort: Some(SortSpec { key: SortKey::Size, direction: SortDirection::Asc }),
        };
        assert_eq!(ids(&search(&items, &narrowed, &catalog)), vec![2]);
    }

    #[test]
    fn query_is_case_insensitive_over_text_fields() {
        let catalog = BrandCatalog::default();
        let items = vec![product(1, "Hankook", "245/45R18", 1, 1), product(2, "Kumho", "r16", 1, 1)];
        let q = |s: &str| SearchCriteria { query: Some(s.into()), ..Default::default() };
        assert_eq!(ids(&search(&items, &q("HANK"), &catalog)), vec![1]);
        assert_eq!(ids(&search(&items, &q("model 2"), &catalog)), vec![2]);
        assert_eq!(ids(&search(&items, &q("R1"), &catalog)).len(), 2);
    }
}
