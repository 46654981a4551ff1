pub mod auth;
pub mod method_guard;
pub mod response;

pub use auth::{jwt_auth_middleware, SessionUser};
pub use method_guard::{method_guard, AllowedMethods};
pub use response::{ApiResponse, ApiResult};
