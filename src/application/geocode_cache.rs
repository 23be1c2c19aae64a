use crate::domain::place::{Coordinates, GeocodedPlace};
use crate::domain::ports::{GeocoderBox, PlaceStoreBox};
use crate::error::Result;
use tracing::{debug, warn};

/// Address → coordinates lookup that only calls the geocoder for addresses
/// without known coordinates.
///
/// Coordinates, once found, are never re-fetched unless [`refresh`](Self::refresh)
/// is called. A failed or empty lookup leaves the place unlocated, so the next
/// call for that address tries again.
pub struct GeocodeCache {
    places: PlaceStoreBox,
    geocoder: GeocoderBox,
}

impl GeocodeCache {
    pub fn new(places: PlaceStoreBox, geocoder: GeocoderBox) -> Self {
        Self { places, geocoder }
    }

    /// Returns `Ok(None)` when the address cannot be located. Only storage
    /// failures are errors.
    pub async fn coordinates_for(&self, address: &str) -> Result<Option<Coordinates>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let (place, created) = self.places.get_or_create(address).await?;
        if let Some(coordinates) = place.coordinates {
            debug!(address, "geocode cache hit");
            return Ok(Some(coordinates));
        }
        debug!(address, created, "geocode cache miss");
        self.fetch(place).await
    }

    /// Queries the geocoder even if coordinates are already cached.
    pub async fn refresh(&self, address: &str) -> Result<Option<Coordinates>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        let (place, _) = self.places.get_or_create(address).await?;
        self.fetch(place).await
    }

    pub async fn places(&self) -> Result<Vec<GeocodedPlace>> {
        self.places.all().await
    }

    async fn fetch(&self, mut place: GeocodedPlace) -> Result<Option<Coordinates>> {
        let coordinates = match self.geocoder.geocode(&place.address).await {
            Ok(found) => {
                if found.is_none() {
                    warn!(address = %place.address, "geocoder found no match");
                }
                found
            }
            Err(e) => {
                warn!(address = %place.address, error = %e, "geocoder request failed");
                None
            }
        };
        // A failed refresh keeps what was known.
        let coordinates = coordinates.or(place.coordinates);
        place.record(coordinates);
        self.places.store(place).await?;
        Ok(coordinates)
    }
}
