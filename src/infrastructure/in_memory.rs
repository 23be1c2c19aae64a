use crate::domain::order::{NewOrder, Order, OrderId};
use crate::domain::place::{Coordinates, GeocodedPlace};
use crate::domain::ports::{Geocoder, OrderStore, PlaceStore};
use crate::error::{FoodCartError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory geocode cache store.
///
/// Uses `Arc<RwLock<HashMap<String, GeocodedPlace>>>` keyed by address.
/// Contents are lost when the process exits.
#[derive(Default, Clone)]
pub struct InMemoryPlaceStore {
    places: Arc<RwLock<HashMap<String, GeocodedPlace>>>,
}

impl InMemoryPlaceStore {
    /// Creates a new, empty in-memory place store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaceStore for InMemoryPlaceStore {
    async fn get(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        let places = self.places.read().await;
        Ok(places.get(address).cloned())
    }

    async fn get_or_create(&self, address: &str) -> Result<(GeocodedPlace, bool)> {
        let mut places = self.places.write().await;
        if let Some(place) = places.get(address) {
            return Ok((place.clone(), false));
        }
        let place = GeocodedPlace::new(address);
        places.insert(address.to_string(), place.clone());
        Ok((place, true))
    }

    async fn store(&self, place: GeocodedPlace) -> Result<()> {
        let mut places = self.places.write().await;
        places.insert(place.address.clone(), place);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<GeocodedPlace>> {
        let places = self.places.read().await;
        let mut all: Vec<GeocodedPlace> = places.values().cloned().collect();
        all.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(all)
    }
}

/// A thread-safe in-memory order store.
///
/// Ids are allocated sequentially, continuing after the highest id present.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with existing orders.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders = orders.into_iter().map(|order| (order.id, order)).collect();
        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let next = orders
            .keys()
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                FoodCartError::InternalError(Box::new(std::io::Error::other(
                    "Order ids exhausted",
                )))
            })?;
        let order = Order::from_new(OrderId(next), order, Utc::now());
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by_key(|order| order.id);
        Ok(all)
    }
}

/// A geocoder answering from a fixed table.
///
/// Counts every call so tests can assert on cache hits. Clones share the
/// counter.
#[derive(Default, Clone)]
pub struct StaticGeocoder {
    known: Arc<HashMap<String, Coordinates>>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    pub fn new(known: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            known: Arc::new(known.into_iter().collect()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `geocode` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.known.get(address).copied())
    }
}
