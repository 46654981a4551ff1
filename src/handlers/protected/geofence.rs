use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::geo::{GeoPoint, Geofence};
use crate::middleware::{ApiResponse, ApiResult};

/// Office geofence as exchanged with clients: flat latitude/longitude/radius (km)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OfficeGeofenceBody {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

impl From<Geofence> for OfficeGeofenceBody {
    fn from(fence: Geofence) -> Self {
        Self {
            latitude: fence.center.latitude,
            longitude: fence.center.longitude,
            radius: fence.radius_km,
        }
    }
}

impl TryFrom<OfficeGeofenceBody> for Geofence {
    type Error = crate::geo::GeoError;

    fn try_from(body: OfficeGeofenceBody) -> Result<Self, Self::Error> {
        Geofence::new(GeoPoint::new(body.longitude, body.latitude)?, body.radius)
    }
}

/// GET /api/v1/geofence - configured office geofence, `null` when none
pub async fn show(State(state): State<AppState>) -> ApiResult<Option<OfficeGeofenceBody>> {
    let fence = state.geofences.current().await?;
    Ok(ApiResponse::success(
        "Office geofence fetched successfully",
        fence.map(OfficeGeofenceBody::from),
    ))
}

/// PUT /api/v1/geofence - validate and replace the office geofence
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<OfficeGeofenceBody>, JsonRejection>,
) -> ApiResult<OfficeGeofenceBody> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return Err(ApiError::from_json_rejection(rejection).unwrap_or_else(|| {
                ApiError::MissingField("latitude, longitude and radius are required.".to_string())
            }))
        }
    };

    let fence = Geofence::try_from(body)?;
    state.geofences.replace(fence).await?;

    Ok(ApiResponse::success("Office geofence updated successfully", fence.into()))
}
