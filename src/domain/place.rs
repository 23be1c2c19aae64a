use crate::error::{FoodCartError, Result};
use chrono::{DateTime, Utc};
use geographiclib_rs::{Geodesic, InverseGeodesic};
use serde::{Deserialize, Serialize};

/// A point on the WGS-84 ellipsoid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(FoodCartError::ValidationError(format!(
                "Latitude out of range: {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(FoodCartError::ValidationError(format!(
                "Longitude out of range: {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Geodesic distance on the WGS-84 ellipsoid, in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let meters: f64 = Geodesic::wgs84().inverse(self.lat, self.lon, other.lat, other.lon);
        meters / 1000.0
    }
}

/// A geocode cache entry.
///
/// Latitude and longitude are stored as one optional value, so a place is
/// either fully located or not located at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub address: String,
    pub coordinates: Option<Coordinates>,
    /// When coordinates were last requested from the geocoder.
    pub requested_at: DateTime<Utc>,
}

impl GeocodedPlace {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coordinates: None,
            requested_at: Utc::now(),
        }
    }

    /// Stores the outcome of a geocode request, successful or not.
    pub fn record(&mut self, coordinates: Option<Coordinates>) {
        self.coordinates = coordinates;
        self.requested_at = Utc::now();
    }
}
