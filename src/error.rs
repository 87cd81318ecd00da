//! Error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("Zone not found")]
    ZoneNotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ShippingError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;
