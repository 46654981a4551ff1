use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::database::models::employee::Employee;
use crate::geo::Geofence;
use crate::location::error::StoreError;
use crate::location::record::DailyLocationRecord;

/// Maps a session identity (login user id) to its employee record
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Employee>, StoreError>;
}

/// Zero-or-one configured office geofence
#[async_trait]
pub trait GeofenceStore: Send + Sync {
    async fn current(&self) -> Result<Option<Geofence>, StoreError>;

    async fn replace(&self, fence: Geofence) -> Result<(), StoreError>;
}

/// Daily location records keyed by (employee, date)
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn find(&self, employee: &str, date: NaiveDate) -> Result<Option<DailyLocationRecord>, StoreError>;

    /// Insert or overwrite the record for its key
    async fn save(&self, record: &DailyLocationRecord) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Process-local storage, used by tests and `ESS_STORAGE=memory`
#[derive(Default)]
pub struct MemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    geofence: RwLock<Option<Geofence>>,
    records: RwLock<HashMap<(String, NaiveDate), DailyLocationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_employee(&self, employee: Employee) {
        let user_id = employee.user_id.clone();
        self.employees.write().await.insert(user_id, employee);
    }

    pub async fn clear_geofence(&self) {
        *self.geofence.write().await = None;
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.read().await.get(user_id).cloned())
    }
}

#[async_trait]
impl GeofenceStore for MemoryStore {
    async fn current(&self) -> Result<Option<Geofence>, StoreError> {
        Ok(*self.geofence.read().await)
    }

    async fn replace(&self, fence: Geofence) -> Result<(), StoreError> {
        *self.geofence.write().await = Some(fence);
        Ok(())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn find(&self, employee: &str, date: NaiveDate) -> Result<Option<DailyLocationRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&(employee.to_string(), date)).map(|r| {
            let mut record = r.clone();
            record.persisted = true;
            record
        }))
    }

    async fn save(&self, record: &DailyLocationRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert((record.employee.clone(), record.date), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[tokio::test]
    async fn one_record_per_key() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let record = DailyLocationRecord::new("EMP-001", date);

        store.save(&record).await.unwrap();
        store.save(&record).await.unwrap();
        assert_eq!(store.record_count().await, 1);

        let found = store.find("EMP-001", date).await.unwrap().unwrap();
        assert!(found.persisted);
        assert!(store.find("EMP-002", date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn geofence_is_replaced_not_appended() {
        let store = MemoryStore::new();
        assert!(store.current().await.unwrap().is_none());

        let first = Geofence::new(GeoPoint::new(72.86, 19.08).unwrap(), 2.0).unwrap();
        let second = Geofence::new(GeoPoint::new(77.59, 12.97).unwrap(), 0.5).unwrap();
        store.replace(first).await.unwrap();
        store.replace(second).await.unwrap();
        assert_eq!(store.current().await.unwrap(), Some(second));

        store.clear_geofence().await;
        assert!(store.current().await.unwrap().is_none());
    }
}
