use super::geocode_cache::GeocodeCache;
use super::intake::{self, OrderSubmission};
use super::ranker::{DistanceRanker, RankedRestaurant};
use super::resolver::AvailabilityResolver;
use crate::domain::catalog::{Catalog, ProductCategory, ProductId, RestaurantId};
use crate::domain::order::{Order, OrderId};
use crate::domain::place::Coordinates;
use crate::domain::ports::OrderStoreBox;
use crate::error::{FoodCartError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

/// A product as exposed by the product list API.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub description: String,
    pub category: Option<ProductCategory>,
    pub image: String,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub total_cost: Decimal,
}

/// Staff-facing entry point: order intake, restaurant selection and
/// assignment.
///
/// Owns the catalog, the order store and the geocode cache. Every call works
/// within a single request; the only state that outlives the process is
/// whatever the cache's place store persists.
pub struct BackOffice {
    catalog: Catalog,
    orders: OrderStoreBox,
    cache: GeocodeCache,
}

impl BackOffice {
    /// Creates a new `BackOffice` instance.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Restaurants, products and menus.
    /// * `orders` - The store for customer orders.
    /// * `cache` - Geocode cache used for distance ranking.
    pub fn new(catalog: Catalog, orders: OrderStoreBox, cache: GeocodeCache) -> Self {
        Self {
            catalog,
            orders,
            cache,
        }
    }

    /// Products that at least one restaurant currently offers.
    pub fn available_products(&self) -> Vec<ProductView> {
        self.catalog
            .available_products()
            .into_iter()
            .map(|product| ProductView {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                special_status: product.special_status,
                description: product.description.clone(),
                category: product
                    .category
                    .and_then(|id| self.catalog.category(id))
                    .cloned(),
                image: product.image.clone(),
            })
            .collect()
    }

    /// Validates and stores a customer order, then warms the geocode cache
    /// for its delivery address.
    pub async fn register_order(&self, submission: OrderSubmission) -> Result<Order> {
        let new_order = intake::validate(&self.catalog, submission)?;
        let order = self.orders.insert(new_order).await?;
        info!(order = %order.id, items = order.items.len(), "order registered");
        self.warm_cache(&order).await;
        Ok(order)
    }

    pub async fn order(&self, id: OrderId) -> Result<Order> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| FoodCartError::NotFound(id.to_string()))
    }

    /// All orders in id order, with their total cost.
    pub async fn orders(&self) -> Result<Vec<OrderSummary>> {
        self.orders
            .all()
            .await?
            .into_iter()
            .map(|order| {
                Ok(OrderSummary {
                    total_cost: order.total_cost()?,
                    order,
                })
            })
            .collect()
    }

    /// Restaurants that can cook the order, nearest to the delivery address
    /// first. An assigned restaurant is the only candidate.
    pub async fn candidate_restaurants(&self, id: OrderId) -> Result<Vec<RankedRestaurant>> {
        let order = self.order(id).await?;
        let candidates = AvailabilityResolver::new(&self.catalog).resolve_for(&order);
        if candidates.is_empty() {
            info!(order = %id, "no restaurant can fulfil the order");
            return Ok(Vec::new());
        }
        DistanceRanker::new(&self.catalog, &self.cache)
            .rank_set(&candidates, &order.address)
            .await
    }

    /// Staff hand the order to a restaurant; the order moves to preparing.
    pub async fn assign_restaurant(&self, id: OrderId, restaurant: RestaurantId) -> Result<Order> {
        if self.catalog.restaurant(restaurant).is_none() {
            return Err(FoodCartError::NotFound(restaurant.to_string()));
        }
        let mut order = self.order(id).await?;
        order.assign_restaurant(restaurant);
        self.orders.store(order.clone()).await?;
        info!(order = %id, %restaurant, "restaurant assigned");
        Ok(order)
    }

    /// Changes the delivery address. A new address is geocoded right away.
    pub async fn update_address(&self, id: OrderId, address: &str) -> Result<Order> {
        let mut order = self.order(id).await?;
        if order.update_address(address) {
            self.orders.store(order.clone()).await?;
            info!(order = %id, "delivery address changed");
            self.warm_cache(&order).await;
        }
        Ok(order)
    }

    pub async fn coordinates_for(&self, address: &str) -> Result<Option<Coordinates>> {
        self.cache.coordinates_for(address).await
    }

    pub async fn refresh_coordinates(&self, address: &str) -> Result<Option<Coordinates>> {
        self.cache.refresh(address).await
    }

    /// The order is already stored, so a cache failure only costs a later
    /// geocode call.
    async fn warm_cache(&self, order: &Order) {
        if let Err(e) = self.cache.coordinates_for(&order.address).await {
            warn!(order = %order.id, error = %e, "could not warm geocode cache");
        }
    }
}
