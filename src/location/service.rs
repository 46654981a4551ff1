use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::GeoPoint;
use crate::location::error::LocationError;
use crate::location::payload::{self, GeoFeatureCollection};
use crate::location::record::RecordManager;
use crate::location::store::{EmployeeDirectory, GeofenceStore, LocationStore};

/// Log target for out-of-fence points
pub const TRACKING_TARGET: &str = "employee_location_tracking";

/// Body of a location submission
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LocationSubmission {
    /// FeatureCollection, either inline or as serialized text
    #[serde(default)]
    pub location: Option<Value>,
    /// `YYYY-MM-DD`; defaults to today in the configured time zone
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub employee: String,
    pub date: NaiveDate,
    pub outside_geofence: Vec<GeoPoint>,
}

/// End-to-end location submission: identity, geofence, validation, storage
#[derive(Clone)]
pub struct LocationService {
    employees: Arc<dyn EmployeeDirectory>,
    geofences: Arc<dyn GeofenceStore>,
    records: RecordManager,
    time_zone: Tz,
}

impl LocationService {
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        geofences: Arc<dyn GeofenceStore>,
        locations: Arc<dyn LocationStore>,
        time_zone: Tz,
    ) -> Self {
        Self {
            employees,
            geofences,
            records: RecordManager::new(locations),
            time_zone,
        }
    }

    pub async fn submit(&self, user_id: &str, request: LocationSubmission) -> Result<SubmitOutcome, LocationError> {
        self.submit_at(user_id, request, Utc::now()).await
    }

    /// `submit` with an explicit clock reading
    pub async fn submit_at(
        &self,
        user_id: &str,
        request: LocationSubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, LocationError> {
        let raw = request
            .location
            .filter(payload::is_present)
            .ok_or(LocationError::MissingField("location"))?;

        let employee = self
            .employees
            .find_by_user(user_id)
            .await?
            .ok_or(LocationError::EmployeeNotFound)?;

        let geofence = self.geofences.current().await?;

        let collection = payload::validate(&raw)?;

        let mut outside_geofence = Vec::new();
        if let Some(fence) = geofence {
            for point in collection.points() {
                if !fence.contains(point) {
                    tracing::warn!(
                        target: TRACKING_TARGET,
                        employee = %employee.name,
                        distance_km = fence.distance_km(point),
                        "Location outside geofence: {}",
                        point
                    );
                    outside_geofence.push(*point);
                }
            }
        }

        let local_now = now.with_timezone(&self.time_zone);
        let date = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => parse_date(text)?,
            None => local_now.date_naive(),
        };

        let mut record = self.records.get_or_create(&employee.name, date).await?;
        self.records
            .apply(&mut record, collection, local_now)
            .await
            .map_err(LocationError::SaveFailed)?;

        Ok(SubmitOutcome {
            employee: employee.name,
            date,
            outside_geofence,
        })
    }

    /// Stored location map for one employee and day
    pub async fn history(&self, employee: &str, date: &str) -> Result<GeoFeatureCollection, LocationError> {
        let date = parse_date(date)?;
        self.records
            .find(employee, date)
            .await?
            .map(|record| record.location_map)
            .ok_or(LocationError::LocationNotFound)
    }
}

pub fn parse_date(text: &str) -> Result<NaiveDate, LocationError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| LocationError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::geo::Geofence;
    use crate::location::store::MemoryStore;
    use crate::testing::{capture_events, employee, mumbai_office, sample_location};
    use tracing::Level;

    async fn service(fence: Option<Geofence>) -> (LocationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.add_employee(employee("EMP-001", "jane@example.com")).await;
        if let Some(fence) = fence {
            store.replace(fence).await.unwrap();
        }
        let service = LocationService::new(store.clone(), store.clone(), store.clone(), chrono_tz::Asia::Kolkata);
        (service, store)
    }

    fn submission(location: Value, date: Option<&str>) -> LocationSubmission {
        LocationSubmission {
            location: Some(location),
            date: date.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn missing_location_is_rejected_first() {
        let (service, _) = service(None).await;
        for location in [None, Some(json!("")), Some(json!({})), Some(Value::Null)] {
            let request = LocationSubmission { location, date: None };
            let err = service.submit("nobody@example.com", request).await.unwrap_err();
            assert!(matches!(err, LocationError::MissingField("location")));
            assert_eq!(err.to_string(), "location is required.");
        }
    }

    #[tokio::test]
    async fn unknown_employee_short_circuits_validation() {
        let (service, store) = service(Some(mumbai_office())).await;
        let garbage = json!({"type": "FeatureCollection"});
        let err = service
            .submit("nobody@example.com", submission(garbage, None))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::EmployeeNotFound));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn malformed_payload_stores_nothing() {
        let (service, store) = service(Some(mumbai_office())).await;
        let mut doc = sample_location();
        doc["features"][0]["geometry"]["coordinates"][3] = json!(["x", 19.08]);
        let err = service
            .submit("jane@example.com", submission(doc, Some("2024-01-10")))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::MalformedPayload(_)));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn points_outside_fence_are_reported_not_rejected() {
        let (service, store) = service(Some(mumbai_office())).await;
        let (warnings, _guard) = capture_events(Level::WARN);
        let outcome = service
            .submit("jane@example.com", submission(sample_location(), Some("2024-01-10")))
            .await
            .unwrap();

        assert_eq!(outcome.employee, "EMP-001");
        assert_eq!(outcome.outside_geofence.len(), 2);
        assert!(outcome
            .outside_geofence
            .contains(&GeoPoint::new(72.840214, 19.105204).unwrap()));

        let warnings = warnings.lock().unwrap().clone();
        let tracked: Vec<_> = warnings.iter().filter(|e| e.target == TRACKING_TARGET).collect();
        assert_eq!(tracked.len(), 2);
        assert!(tracked
            .iter()
            .any(|e| e.message == "Location outside geofence: [72.840214, 19.105204]"));

        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let stored = store.find("EMP-001", date).await.unwrap().unwrap();
        assert_eq!(stored.location_map.points().count(), 7);
    }

    #[tokio::test]
    async fn no_fence_means_no_warnings() {
        let (service, _) = service(None).await;
        let (warnings, _guard) = capture_events(Level::WARN);
        let mut doc = sample_location();
        doc["features"][0]["geometry"]["coordinates"][0] = json!([-0.1276, 51.5072]);
        let outcome = service
            .submit("jane@example.com", submission(doc, None))
            .await
            .unwrap();
        assert!(outcome.outside_geofence.is_empty());
        assert!(warnings
            .lock()
            .unwrap()
            .iter()
            .all(|e| e.target != TRACKING_TARGET));
    }

    #[tokio::test]
    async fn date_defaults_to_local_today() {
        let (service, store) = service(None).await;
        // 20:00 UTC on the 9th is already the 10th in Kolkata
        let now = Utc.with_ymd_and_hms(2024, 1, 9, 20, 0, 0).unwrap();
        let outcome = service
            .submit_at("jane@example.com", submission(sample_location(), None), now)
            .await
            .unwrap();
        assert_eq!(outcome.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        let stored = store.find("EMP-001", outcome.date).await.unwrap().unwrap();
        assert_eq!(
            stored.location_map.features[0].properties["timestamp"],
            json!("2024-01-10T01:30:00.000000+05:30")
        );
    }

    #[tokio::test]
    async fn invalid_date_is_rejected() {
        let (service, _) = service(None).await;
        let err = service
            .submit("jane@example.com", submission(sample_location(), Some("10/01/2024")))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn history_returns_stored_map() {
        let (service, _) = service(None).await;
        assert!(matches!(
            service.history("EMP-001", "2024-01-10").await,
            Err(LocationError::LocationNotFound)
        ));

        service
            .submit("jane@example.com", submission(sample_location(), Some("2024-01-10")))
            .await
            .unwrap();
        let map = service.history("EMP-001", "2024-01-10").await.unwrap();
        assert_eq!(map.points().count(), 7);
        assert!(map.features[0].properties.contains_key("timestamp"));
    }
}
