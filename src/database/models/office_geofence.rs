use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::{GeoError, GeoPoint, Geofence};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfficeGeofence {
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometres
    pub radius: f64,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OfficeGeofence> for Geofence {
    type Error = GeoError;

    fn try_from(row: OfficeGeofence) -> Result<Self, Self::Error> {
        let center = GeoPoint::new(row.longitude, row.latitude)?;
        // Stored radius is taken as-is; a zero radius only admits the centre point
        Ok(Geofence { center, radius_km: row.radius })
    }
}
