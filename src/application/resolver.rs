use crate::domain::catalog::{Catalog, ProductId, RestaurantId};
use crate::domain::order::Order;
use std::collections::HashSet;

/// Finds the restaurants able to cook a whole order.
pub struct AvailabilityResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Restaurants offering every distinct product with availability = true.
    ///
    /// An empty product list resolves to no restaurants. Orders without items
    /// are rejected at intake, so this only guards direct callers.
    pub fn resolve(&self, product_ids: &[ProductId]) -> HashSet<RestaurantId> {
        let mut seen = HashSet::new();
        let mut candidates: Option<HashSet<RestaurantId>> = None;

        for &product in product_ids {
            if !seen.insert(product) {
                continue;
            }
            let offering = self.catalog.restaurants_with_available(product);
            let narrowed = match candidates {
                Some(current) => current.intersection(&offering).copied().collect(),
                None => offering,
            };
            if narrowed.is_empty() {
                return HashSet::new();
            }
            candidates = Some(narrowed);
        }

        candidates.unwrap_or_default()
    }

    /// Like [`resolve`](Self::resolve), but a restaurant already assigned to
    /// the order wins over the computed set.
    pub fn resolve_for(&self, order: &Order) -> HashSet<RestaurantId> {
        match order.restaurant {
            Some(assigned) => HashSet::from([assigned]),
            None => self.resolve(&order.product_ids()),
        }
    }
}
