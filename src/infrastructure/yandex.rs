//! Yandex Maps geocoder client.
//!
//! - Base URL: `https://geocode-maps.yandex.ru/1.x`
//! - Authentication: API key passed as the `apikey` query parameter
//! - Only the most relevant match (the first feature member) is used

use crate::domain::place::Coordinates;
use crate::domain::ports::Geocoder;
use crate::error::{FoodCartError, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// Yandex geocoder base URL.
pub const BASE_URL: &str = "https://geocode-maps.yandex.ru/1.x";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    /// "lon lat", space separated.
    pos: String,
}

/// Geocoder backed by the Yandex HTTP API.
#[derive(Clone)]
pub struct YandexGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl YandexGeocoder {
    /// Create a new client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, timeout, BASE_URL)
    }

    pub fn with_base_url(
        api_key: SecretString,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let response: GeocodeResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.expose_secret()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_response(response)
    }
}

fn parse_response(response: GeocodeResponse) -> Result<Option<Coordinates>> {
    let Some(most_relevant) = response.response.collection.feature_members.first() else {
        return Ok(None);
    };
    parse_pos(&most_relevant.geo_object.point.pos).map(Some)
}

fn parse_pos(pos: &str) -> Result<Coordinates> {
    let invalid = || FoodCartError::ValidationError(format!("Malformed geocoder position: {pos}"));
    let mut parts = pos.split_whitespace();
    let lon: f64 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let lat: f64 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    Coordinates::new(lat, lon)
}
