//! Daily location tracking: payload validation, geofence checks and the
//! per-employee-per-day record.

pub mod error;
pub mod payload;
pub mod record;
pub mod service;
pub mod store;

pub use error::{LocationError, StoreError};
pub use payload::{GeoFeature, GeoFeatureCollection, Geometry, Position};
pub use record::{DailyLocationRecord, RecordManager};
pub use service::{LocationService, LocationSubmission, SubmitOutcome};
pub use store::{EmployeeDirectory, GeofenceStore, LocationStore, MemoryStore};
