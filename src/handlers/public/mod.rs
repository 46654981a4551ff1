use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "status_code": 200,
        "message": "Employee Self Service mobile API",
        "data": {
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "location": "/api/v1/location (POST, protected)",
                "location_history": "/api/v1/location/:employee/:date (GET, protected)",
                "geofence": "/api/v1/geofence (GET, PUT, protected)",
            }
        }
    }))
}

/// GET /health - liveness plus a storage ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.storage.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status_code": 200,
                "message": "ok",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status_code": 503,
                    "message": "storage unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "storage_error": e.to_string()
                    }
                })),
            )
        }
    }
}
