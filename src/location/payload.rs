use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::geo::GeoPoint;
use crate::location::error::LocationError;

/// GeoJSON FeatureCollection as submitted by the mobile client.
///
/// Only the coordinates are interpreted. Every other key, `type` included,
/// is carried as raw JSON so the stored document matches what was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeatureCollection {
    #[serde(rename = "type")]
    pub kind: Value,
    pub features: Vec<GeoFeature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<Position>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One GeoJSON position. Entries past longitude/latitude (altitude and
/// friends) are carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub point: GeoPoint,
    pub trailing: Vec<Value>,
}

impl From<GeoPoint> for Position {
    fn from(point: GeoPoint) -> Self {
        Self { point, trailing: Vec::new() }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2 + self.trailing.len()))?;
        seq.serialize_element(&self.point.longitude)?;
        seq.serialize_element(&self.point.latitude)?;
        for value in &self.trailing {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        match values.as_slice() {
            [longitude, latitude, trailing @ ..] => {
                let (Some(longitude), Some(latitude)) = (longitude.as_f64(), latitude.as_f64()) else {
                    return Err(de::Error::custom("longitude and latitude must be numbers"));
                };
                Ok(Self {
                    point: GeoPoint::new(longitude, latitude).map_err(de::Error::custom)?,
                    trailing: trailing.to_vec(),
                })
            }
            _ => Err(de::Error::invalid_length(values.len(), &"at least two ordinates")),
        }
    }
}

/// `properties` that is absent, null or not an object starts out empty
fn properties_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

impl GeoFeatureCollection {
    pub fn empty() -> Self {
        Self {
            kind: Value::String("FeatureCollection".to_string()),
            features: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Every position of every feature, in submission order
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.features
            .iter()
            .flat_map(|f| f.geometry.coordinates.iter().map(|p| &p.point))
    }

    /// Stamp the same timestamp onto every feature
    pub fn stamp(&mut self, timestamp: &str) {
        for feature in &mut self.features {
            feature
                .properties
                .insert("timestamp".to_string(), Value::String(timestamp.to_string()));
        }
    }
}

impl Default for GeoFeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

fn malformed(reason: impl std::fmt::Display) -> LocationError {
    LocationError::MalformedPayload(format!("Error processing location data: {}", reason))
}

/// Validate a raw `location` value and turn it into a typed collection.
///
/// Accepts either the JSON document itself or its serialized text.
pub fn validate(raw: &Value) -> Result<GeoFeatureCollection, LocationError> {
    let decoded;
    let document = match raw {
        Value::String(text) => {
            decoded = serde_json::from_str::<Value>(text).map_err(|_| {
                LocationError::MalformedPayload("Invalid JSON format in location data".to_string())
            })?;
            &decoded
        }
        other => other,
    };

    let object = document
        .as_object()
        .ok_or_else(|| malformed("Invalid location data format"))?;

    if !["type", "features"].iter().all(|key| object.contains_key(*key)) {
        return Err(malformed("Missing required fields in location data"));
    }

    let features = object["features"]
        .as_array()
        .ok_or_else(|| malformed("Invalid location data format"))?;

    for feature in features {
        let coordinates = feature
            .get("geometry")
            .and_then(|g| g.get("coordinates"))
            .filter(|c| is_present(c))
            .ok_or_else(|| malformed("Missing coordinates in feature"))?;

        let coordinates = coordinates
            .as_array()
            .ok_or_else(|| malformed("Invalid coordinate values"))?;

        for coord in coordinates {
            let (lng, lat) = numeric_pair(coord).ok_or_else(|| malformed("Invalid coordinate values"))?;
            GeoPoint::new(lng, lat)
                .map_err(|e| malformed(format!("Coordinate out of range: {} ({})", coord, e)))?;
        }
    }

    serde_json::from_value(document.clone()).map_err(malformed)
}

fn numeric_pair(coord: &Value) -> Option<(f64, f64)> {
    match coord.as_array()?.as_slice() {
        [lng, lat, ..] => Some((lng.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

/// Mirrors the truthiness check the mobile client relies on: null, false, 0,
/// empty strings and empty containers all count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
