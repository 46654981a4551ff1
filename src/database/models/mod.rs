pub mod employee;
pub mod employee_location;
pub mod office_geofence;

pub use employee::Employee;
pub use employee_location::EmployeeLocation;
pub use office_geofence::OfficeGeofence;
