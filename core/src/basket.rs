//! The user's basket.
//!
//! Holds value copies of catalog items, unique by id, in insertion order.
//! [`Basket`] only maintains the collection; change notifications are
//! produced by [`AppState`](crate::AppState), which owns it.

use crate::product::{Price, ProductId, ProductItem};
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free selection of products
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    items: Vec<ProductItem>,
}

impl Basket {
    /// Creates an empty basket
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends `item` unless an item with the same id is already present.
    ///
    /// Returns `true` if the basket changed.
    pub fn add(&mut self, item: ProductItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the item with `id`. Absent ids are ignored.
    ///
    /// Returns `true` if the basket changed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Empties the basket
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keeps only the items for which `f` returns a replacement.
    ///
    /// Returns `true` if any item was dropped or replaced by a different value.
    pub fn refresh<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&ProductItem) -> Option<ProductItem>,
    {
        let mut changed = false;
        let refreshed: Vec<ProductItem> = self
            .items
            .iter()
            .filter_map(|item| {
                let replacement = f(item);
                changed |= replacement.as_ref() != Some(item);
                replacement
            })
            .collect();
        self.items = refreshed;
        changed
    }

    /// Sum of the prices of all items.
    ///
    /// Unpriced items contribute nothing; finding one is reported as an
    /// invariant violation.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(|item| {
                item.price.unwrap_or_else(|| {
                    crate::invariant_violation("unpriced item in basket", &item.id);
                    Price::ZERO
                })
            })
            .sum()
    }

    /// Number of items
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the basket is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with `id` is present
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Items in insertion order
    #[must_use]
    pub fn items(&self) -> &[ProductItem] {
        &self.items
    }

    /// Item ids in insertion order
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Category;

    fn item(id: &str, price: u64) -> ProductItem {
        ProductItem::new(ProductId::new(id), id, Category::Other, Some(Price::new(price)))
    }

    #[test]
    fn add_is_unique_by_id() {
        let mut basket = Basket::new();
        assert!(basket.add(item("a", 100)));
        assert!(!basket.add(item("a", 100)));

        // Same id, different value: still a duplicate
        let mut renamed = item("a", 100);
        renamed.title = "renamed".to_string();
        assert!(!basket.add(renamed));

        assert_eq!(basket.count(), 1);
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut basket = Basket::new();
        basket.add(item("c", 1));
        basket.add(item("a", 1));
        basket.add(item("b", 1));
        assert_eq!(
            basket.ids(),
            vec![ProductId::new("c"), ProductId::new("a"), ProductId::new("b")]
        );
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut basket = Basket::new();
        basket.add(item("a", 100));
        assert!(!basket.remove(&ProductId::new("zzz")));
        assert!(basket.remove(&ProductId::new("a")));
        assert!(basket.is_empty());
    }

    #[test]
    fn total_sums_prices() {
        let mut basket = Basket::new();
        assert_eq!(basket.total(), Price::ZERO);
        basket.add(item("a", 100));
        basket.add(item("b", 2500));
        assert_eq!(basket.total(), Price::new(2600));
    }

    #[test]
    fn unpriced_item_contributes_zero() {
        let mut basket = Basket::new();
        basket.add(item("a", 100));
        basket.add(ProductItem::new(ProductId::new("free"), "free", Category::Other, None));
        assert_eq!(basket.total(), Price::new(100));
    }

    #[test]
    fn refresh_drops_and_replaces() {
        let mut basket = Basket::new();
        basket.add(item("a", 100));
        basket.add(item("b", 200));

        let changed = basket.refresh(|existing| {
            (existing.id.as_str() == "a").then(|| item("a", 150))
        });

        assert!(changed);
        assert_eq!(basket.ids(), vec![ProductId::new("a")]);
        assert_eq!(basket.total(), Price::new(150));

        assert!(!basket.refresh(|existing| Some(existing.clone())));
    }

    #[test]
    fn clear_empties() {
        let mut basket = Basket::new();
        basket.add(item("a", 100));
        basket.clear();
        assert_eq!(basket.count(), 0);
        assert_eq!(basket.total(), Price::ZERO);
    }
}
