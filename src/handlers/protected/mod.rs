// handlers/protected/mod.rs - endpoints behind JWT authentication
//
// Every handler here receives the caller as an explicit `SessionUser`
// extension inserted by `jwt_auth_middleware`.
pub mod geofence;
pub mod location;
