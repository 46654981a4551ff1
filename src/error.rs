// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use scraper::Html;
use serde_json::{json, Value};

use crate::geo::GeoError;
use crate::location::{LocationError, StoreError};

/// HTTP API error rendered into the `{status_code, message, data}` envelope.
///
/// Client input problems are reported as 500, which is what the mobile app
/// expects; only missing records are 404 and only auth failures are 401.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InvalidRequestMethod,
    MissingField(String),
    MalformedPayload(String),
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRequestMethod => 500,
            ApiError::MissingField(_) => 500,
            ApiError::MalformedPayload(_) => 500,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InvalidRequestMethod => "Invalid Request Method",
            ApiError::MissingField(msg) => msg,
            ApiError::MalformedPayload(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let message = if self.status_code() == 500 {
            strip_markup(self.message())
        } else {
            self.message().to_string()
        };

        json!({
            "status_code": self.status_code(),
            "message": message,
            "data": []
        })
    }
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl ApiError {
    /// Map a rejected JSON body. `None` means there was no usable JSON body
    /// at all (absent, wrong content type or not JSON), which handlers treat
    /// as missing fields. A JSON body of the wrong shape is malformed.
    pub fn from_json_rejection(rejection: JsonRejection) -> Option<Self> {
        match rejection {
            JsonRejection::MissingJsonContentType(_) | JsonRejection::JsonSyntaxError(_) => None,
            other => Some(ApiError::MalformedPayload(other.body_text())),
        }
    }
}

/// Text content of a message that may carry HTML markup
pub fn strip_markup(message: &str) -> String {
    Html::parse_fragment(message).root_element().text().collect()
}

// Convert other error types to ApiError
const PERSISTENCE_FAILURE: &str = "An error occurred while processing your request";

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::MissingField(_) => ApiError::MissingField(err.to_string()),
            LocationError::EmployeeNotFound | LocationError::LocationNotFound => {
                ApiError::not_found(err.to_string())
            }
            LocationError::MalformedPayload(msg) => ApiError::MalformedPayload(msg),
            LocationError::InvalidDate(_) => ApiError::MalformedPayload(err.to_string()),
            // Already logged where the save was attempted
            LocationError::SaveFailed(_) => ApiError::internal_server_error(PERSISTENCE_FAILURE),
            LocationError::Persistence(store_err) => store_err.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the real error but return generic message
        tracing::error!(target: "ess_mobile_app_error", "Storage error: {}", err);
        ApiError::internal_server_error(PERSISTENCE_FAILURE)
    }
}

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        ApiError::MalformedPayload(err.to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
