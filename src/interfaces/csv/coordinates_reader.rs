use crate::domain::place::Coordinates;
use crate::error::{FoodCartError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CoordinatesRecord {
    address: String,
    lat: f64,
    lon: f64,
}

/// Reads a fixed `address,lat,lon` table used to seed a static geocoder.
pub struct CoordinatesReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CoordinatesReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields `(address, coordinates)` pairs; out-of-range values are errors.
    pub fn entries(self) -> impl Iterator<Item = Result<(String, Coordinates)>> {
        self.reader.into_deserialize().map(|result| {
            let record: CoordinatesRecord = result.map_err(FoodCartError::from)?;
            Ok((record.address, Coordinates::new(record.lat, record.lon)?))
        })
    }
}
