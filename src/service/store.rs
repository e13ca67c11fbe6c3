use crate::error::{OrderError, OverrideError};
use crate::models::{
    clamp_discount_rate, LowStockAlert, MergedProduct, OrderReceipt, OrderSource, ProductId,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard};

type ProductMap = DashMap<ProductId, MergedProduct>;

/// Session product store, rebuilt on every reconcile.
/// Ids are assigned in merge order, so id order is output order.
///
/// Readers and per-record writers share the outer lock; `replace` takes it
/// exclusively, so a cycle's products are never mixed with another's.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<ProductMap>,
    alerts: Mutex<Vec<LowStockAlert>>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn products(&self) -> RwLockReadGuard<'_, ProductMap> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a fresh merge result; overrides from the previous cycle are gone
    pub fn replace(&self, products: Vec<MergedProduct>) {
        let fresh: ProductMap = products.into_iter().map(|p| (p.id, p)).collect();
        *self.products.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.products().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products().is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<MergedProduct> {
        self.products().get(&id).map(|p| p.clone())
    }

    /// All products in merge order
    pub fn snapshot(&self) -> Vec<MergedProduct> {
        let mut all: Vec<MergedProduct> = self.products().iter().map(|p| p.value().clone()).collect();
        all.sort_by_key(|p| p.id);
        all
    }

    /// Set the session discount rate, clamped to [0, 100]
    pub fn set_discount_rate(&self, id: ProductId, rate: BigDecimal) -> Result<MergedProduct, OverrideError> {
        let products = self.products();
        let mut product = products.get_mut(&id).ok_or(OverrideError::RecordNotFound(id))?;
        product.discount_rate = clamp_discount_rate(rate);
        Ok(product.clone())
    }

    /// Override the factory price for this session; must stay positive
    pub fn set_factory_price(&self, id: ProductId, price: i64) -> Result<MergedProduct, OverrideError> {
        if price <= 0 {
            return Err(OverrideError::NonPositivePrice(price));
        }
        let products = self.products();
        let mut product = products.get_mut(&id).ok_or(OverrideError::RecordNotFound(id))?;
        product.factory_price = price;
        Ok(product.clone())
    }

    /// Check-and-decrement under the record's lock; a failed order mutates nothing
    pub fn apply_order(&self, id: ProductId, quantity: u32, source: OrderSource) -> Result<OrderReceipt, OrderError> {
        let requested = i64::from(quantity);
        let products = self.products();
        let mut product = products.get_mut(&id).ok_or(OrderError::RecordNotFound(id))?;
        let remaining = product
            .take_stock(requested, source)
            .map_err(|available| OrderError::InsufficientStock {
                product_id: id,
                requested,
                available,
            })?;

        let low_stock = (remaining <= product.reorder_point).then(|| LowStockAlert {
            product_id: id,
            brand: product.brand.clone(),
            model: product.model.clone(),
            size: product.size.clone(),
            source,
            remaining,
            reorder_point: product.reorder_point,
            raised_at: Utc::now(),
        });
        drop(product);
        drop(products);

        if let Some(alert) = &low_stock {
            tracing::warn!(
                "Low stock: {} {} {} has {} left ({:?}, reorder point {})",
                alert.brand, alert.model, alert.size, alert.remaining, alert.source, alert.reorder_point
            );
            self.alerts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(alert.clone());
        }

        Ok(OrderReceipt {
            product_id: id,
            quantity: requested,
            source,
            remaining,
            low_stock,
        })
    }

    /// Low-stock signals raised this session, oldest first
    pub fn alerts(&self) -> Vec<LowStockAlert> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
