use crate::domain::place::GeocodedPlace;
use crate::domain::ports::PlaceStore;
use crate::error::{FoodCartError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for geocoded places, keyed by address.
pub const CF_PLACES: &str = "places";

/// A persistent geocode cache store using RocksDB.
///
/// Places are stored as JSON under the UTF-8 bytes of their address, so a
/// coordinate fetched once survives process restarts.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBPlaceStore {
    db: Arc<DB>,
}

impl RocksDBPlaceStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "places" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_places = ColumnFamilyDescriptor::new(CF_PLACES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_places])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        let cf = self.places_cf()?;
        match self.db.get_cf(&cf, address.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, place: &GeocodedPlace) -> Result<()> {
        let cf = self.places_cf()?;
        let value = serde_json::to_vec(place).map_err(|e| {
            FoodCartError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(&cf, place.address.as_bytes(), value)?;
        Ok(())
    }

    fn places_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_PLACES).ok_or_else(|| {
            FoodCartError::InternalError(Box::new(std::io::Error::other(
                "Places column family not found",
            )))
        })
    }
}

fn decode(bytes: &[u8]) -> Result<GeocodedPlace> {
    serde_json::from_slice(bytes).map_err(|e| {
        FoodCartError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl PlaceStore for RocksDBPlaceStore {
    async fn get(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        self.read(address)
    }

    async fn get_or_create(&self, address: &str) -> Result<(GeocodedPlace, bool)> {
        // Not atomic: two racing callers may both create the row. The later
        // write wins and both geocode once, which is harmless.
        if let Some(place) = self.read(address)? {
            return Ok((place, false));
        }
        let place = GeocodedPlace::new(address);
        self.write(&place)?;
        Ok((place, true))
    }

    async fn store(&self, place: GeocodedPlace) -> Result<()> {
        self.write(&place)
    }

    async fn all(&self) -> Result<Vec<GeocodedPlace>> {
        let cf = self.places_cf()?;
        let mut places = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| {
                FoodCartError::InternalError(Box::new(std::io::Error::other(format!(
                    "RocksDB iteration error: {}",
                    e
                ))))
            })?;
            places.push(decode(&value)?);
        }
        Ok(places)
    }
}
