use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodCartError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Geocoder error: {0}")]
    GeocoderError(#[from] reqwest::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for FoodCartError {
    fn from(err: rocksdb::Error) -> Self {
        FoodCartError::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FoodCartError>;
