use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::location::{GeoFeatureCollection, LocationSubmission};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};

/// POST /api/v1/location - store today's (or `date`'s) track for the caller
///
/// Expected Input:
/// ```json
/// {
///   "location": { "type": "FeatureCollection", "features": [ ... ] },
///   "date": "2024-01-10"
/// }
/// ```
/// `location` may also be the FeatureCollection serialized as a string.
/// Points outside the office geofence are logged, never rejected.
pub async fn user_location(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    body: Result<Json<LocationSubmission>, JsonRejection>,
) -> ApiResult<Vec<Value>> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => match ApiError::from_json_rejection(rejection) {
            // No usable body reads as a request without `location`
            None => LocationSubmission::default(),
            Some(err) => return Err(err),
        },
    };

    let outcome = state.locations.submit(&session.user, request).await?;

    tracing::debug!(
        "Stored location for {} on {} ({} point(s) outside geofence)",
        outcome.employee,
        outcome.date,
        outcome.outside_geofence.len()
    );
    Ok(ApiResponse::message("Location updated successfully."))
}

/// GET /api/v1/location/:employee/:date - stored location map for one day
pub async fn employee_location(
    State(state): State<AppState>,
    Path((employee, date)): Path<(String, String)>,
) -> ApiResult<GeoFeatureCollection> {
    let location_map = state.locations.history(&employee, &date).await?;
    Ok(ApiResponse::success("Location details fetched successfully", location_map))
}
