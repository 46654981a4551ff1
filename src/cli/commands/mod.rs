pub mod employee;
pub mod geofence;
pub mod location;
pub mod token;
