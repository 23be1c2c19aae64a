use super::order::{NewOrder, Order, OrderId};
use super::place::{Coordinates, GeocodedPlace};
use crate::error::Result;
use async_trait::async_trait;

/// Persistent address → coordinates store backing the geocode cache.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    async fn get(&self, address: &str) -> Result<Option<GeocodedPlace>>;
    /// Returns the stored place, inserting an empty one when absent.
    /// The flag is true when the place was created by this call.
    async fn get_or_create(&self, address: &str) -> Result<(GeocodedPlace, bool)>;
    async fn store(&self, place: GeocodedPlace) -> Result<()>;
    async fn all(&self) -> Result<Vec<GeocodedPlace>>;
}

/// External address lookup. `Ok(None)` means the address had no match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Allocates the next id and stores the order.
    async fn insert(&self, order: NewOrder) -> Result<Order>;
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;
    async fn store(&self, order: Order) -> Result<()>;
    async fn all(&self) -> Result<Vec<Order>>;
}

pub type PlaceStoreBox = Box<dyn PlaceStore>;
pub type GeocoderBox = Box<dyn Geocoder>;
pub type OrderStoreBox = Box<dyn OrderStore>;

pub type PlaceStoreFactory = Box<dyn Fn() -> PlaceStoreBox + Send + Sync>;
