use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeLocation, OfficeGeofence};
use crate::geo::Geofence;
use crate::location::error::StoreError;
use crate::location::record::DailyLocationRecord;
use crate::location::store::{EmployeeDirectory, GeofenceStore, LocationStore};

/// Postgres-backed implementation of every store seam
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update an employee mapping (used by the operator CLI)
    pub async fn upsert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO employees (name, user_id, employee_name, company)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (name) DO UPDATE
             SET user_id = EXCLUDED.user_id,
                 employee_name = EXCLUDED.employee_name,
                 company = EXCLUDED.company",
        )
        .bind(&employee.name)
        .bind(&employee.user_id)
        .bind(&employee.employee_name)
        .bind(&employee.company)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for PgRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT name, user_id, employee_name, company
             FROM employees
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}

#[async_trait]
impl GeofenceStore for PgRepository {
    async fn current(&self) -> Result<Option<Geofence>, StoreError> {
        let row = sqlx::query_as::<_, OfficeGeofence>(
            "SELECT latitude, longitude, radius, updated_at
             FROM office_geofencing
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Geofence::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, fence: Geofence) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO office_geofencing (id, latitude, longitude, radius, updated_at)
             VALUES (1, $1, $2, $3, now())
             ON CONFLICT (id) DO UPDATE
             SET latitude = EXCLUDED.latitude,
                 longitude = EXCLUDED.longitude,
                 radius = EXCLUDED.radius,
                 updated_at = now()",
        )
        .bind(fence.center.latitude)
        .bind(fence.center.longitude)
        .bind(fence.radius_km)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Office geofence set to {} with radius {} km",
            fence.center,
            fence.radius_km
        );
        Ok(())
    }
}

#[async_trait]
impl LocationStore for PgRepository {
    async fn find(&self, employee: &str, date: NaiveDate) -> Result<Option<DailyLocationRecord>, StoreError> {
        let row = sqlx::query_as::<_, EmployeeLocation>(
            "SELECT id, employee, date, location_map, created_at, updated_at
             FROM employee_locations
             WHERE employee = $1 AND date = $2",
        )
        .bind(employee)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let location_map = serde_json::from_value(row.location_map).map_err(|e| {
                StoreError::Corrupt(format!("location_map of {} on {}: {}", row.employee, row.date, e))
            })?;
            Ok(DailyLocationRecord {
                employee: row.employee,
                date: row.date,
                location_map,
                persisted: true,
            })
        })
        .transpose()
    }

    async fn save(&self, record: &DailyLocationRecord) -> Result<(), StoreError> {
        let location_map = serde_json::to_value(&record.location_map)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        sqlx::query(
            "INSERT INTO employee_locations (id, employee, date, location_map)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (employee, date) DO UPDATE
             SET location_map = EXCLUDED.location_map,
                 updated_at = now()",
        )
        .bind(Uuid::new_v4())
        .bind(&record.employee)
        .bind(record.date)
        .bind(location_map)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
