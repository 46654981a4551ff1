use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    #[error("Latitude must be between -90 and 90 degrees (got {0})")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180 degrees (got {0})")]
    LongitudeOutOfRange(f64),

    #[error("Radius must be greater than 0 (got {0})")]
    InvalidRadius(f64),
}

/// A WGS84 position. Serialized the GeoJSON way: `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        Ok(Self { longitude, latitude })
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.longitude)?;
        seq.serialize_element(&self.latitude)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            [longitude, latitude, ..] => {
                GeoPoint::new(*longitude, *latitude).map_err(de::Error::custom)
            }
            _ => Err(de::Error::invalid_length(values.len(), &"a [longitude, latitude] pair")),
        }
    }
}

/// Circular office zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl Geofence {
    /// Build a fence from operator input. The radius must be strictly positive.
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self, GeoError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(GeoError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        is_within(point, self)
    }

    pub fn distance_km(&self, point: &GeoPoint) -> f64 {
        haversine_distance_km(point, &self.center)
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in kilometres
pub fn haversine_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = to_radians(a.latitude);
    let lon1_rad = to_radians(a.longitude);
    let lat2_rad = to_radians(b.latitude);
    let lon2_rad = to_radians(b.longitude);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn is_within(point: &GeoPoint, fence: &Geofence) -> bool {
    haversine_distance_km(point, &fence.center) <= fence.radius_km
}
