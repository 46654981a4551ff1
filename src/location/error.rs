use thiserror::Error;

use crate::geo::GeoError;

/// Storage failures from any backend behind the store traits
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] crate::database::DatabaseError),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("Invalid geofence configuration: {0}")]
    InvalidGeofence(#[from] GeoError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.into())
    }
}

/// Failures surfaced by the location submission flow
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Employee not found for current user")]
    EmployeeNotFound,

    #[error("{0}")]
    MalformedPayload(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Location details not found for employee")]
    LocationNotFound,

    #[error("Error updating location document: {0}")]
    SaveFailed(StoreError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
