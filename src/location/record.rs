use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat};
use chrono_tz::Tz;
use serde::Serialize;

use crate::location::error::StoreError;
use crate::location::payload::GeoFeatureCollection;
use crate::location::store::LocationStore;

/// Location track of one employee for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLocationRecord {
    pub employee: String,
    pub date: NaiveDate,
    pub location_map: GeoFeatureCollection,
    /// False until the record has been written once
    #[serde(skip)]
    pub persisted: bool,
}

impl DailyLocationRecord {
    pub fn new(employee: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee: employee.into(),
            date,
            location_map: GeoFeatureCollection::empty(),
            persisted: false,
        }
    }
}

/// Find-or-create and overwrite daily location records
#[derive(Clone)]
pub struct RecordManager {
    store: Arc<dyn LocationStore>,
}

impl RecordManager {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    /// Existing record for the key, or an unsaved empty one
    pub async fn get_or_create(&self, employee: &str, date: NaiveDate) -> Result<DailyLocationRecord, StoreError> {
        match self.store.find(employee, date).await? {
            Some(record) => Ok(record),
            None => {
                tracing::debug!("No location record for {} on {}, creating", employee, date);
                Ok(DailyLocationRecord::new(employee, date))
            }
        }
    }

    /// Stamp `now` on every feature, replace the stored map and save.
    ///
    /// A second submission for the same day overwrites the first one.
    pub async fn apply(
        &self,
        record: &mut DailyLocationRecord,
        mut collection: GeoFeatureCollection,
        now: DateTime<Tz>,
    ) -> Result<(), StoreError> {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, false);
        collection.stamp(&timestamp);

        if record.persisted && !record.location_map.features.is_empty() {
            tracing::warn!(
                "Replacing {} earlier feature(s) for employee {} on {}",
                record.location_map.features.len(),
                record.employee,
                record.date
            );
        }
        record.location_map = collection;

        if let Err(e) = self.store.save(record).await {
            tracing::error!("Error updating location document: {}", e);
            return Err(e);
        }

        record.persisted = true;
        tracing::info!("Location updated for employee {}", record.employee);
        Ok(())
    }

    pub async fn find(&self, employee: &str, date: NaiveDate) -> Result<Option<DailyLocationRecord>, StoreError> {
        self.store.find(employee, date).await
    }
}
