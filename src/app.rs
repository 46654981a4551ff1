use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware::from_fn_with_state,
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, PgRepository};
use crate::handlers::{protected, public};
use crate::location::{EmployeeDirectory, GeofenceStore, LocationService, LocationStore, MemoryStore};
use crate::middleware::{jwt_auth_middleware, method_guard, AllowedMethods};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub locations: LocationService,
    pub geofences: Arc<dyn GeofenceStore>,
    pub storage: Arc<dyn LocationStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        employees: Arc<dyn EmployeeDirectory>,
        geofences: Arc<dyn GeofenceStore>,
        storage: Arc<dyn LocationStore>,
    ) -> Self {
        let locations = LocationService::new(
            employees,
            geofences.clone(),
            storage.clone(),
            config.location.time_zone,
        );
        Self {
            config: Arc::new(config),
            locations,
            geofences,
            storage,
        }
    }

    /// Every seam backed by one in-memory store
    pub fn in_memory(config: AppConfig, store: Arc<MemoryStore>) -> Self {
        Self::new(config, store.clone(), store.clone(), store)
    }

    /// Build state for the configured storage backend
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        match config.server.storage {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; location records are lost on restart");
                Ok(Self::in_memory(config, Arc::new(MemoryStore::new())))
            }
            StorageBackend::Postgres => {
                let database = DatabaseManager::connect(&config.database).await?;
                database.ensure_schema().await?;
                let repository = Arc::new(PgRepository::new(database.pool().clone()));
                Ok(Self::new(config, repository.clone(), repository.clone(), repository))
            }
        }
    }
}

fn allow(methods: impl IntoIterator<Item = Method>) -> AllowedMethods {
    AllowedMethods::new(methods)
}

pub fn router(state: AppState) -> Router {
    let max_body = state.config.api.max_request_size_bytes;

    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(protected_routes(state.clone()))
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(max_body));

    if state.config.security.enable_cors {
        app = app.layer(cors_layer(&state.config.security.cors_origins));
    }
    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{geofence, location};

    Router::new()
        .route(
            "/api/v1/location",
            any(location::user_location).layer(from_fn_with_state(allow([Method::POST]), method_guard)),
        )
        .route(
            "/api/v1/location/:employee/:date",
            any(location::employee_location).layer(from_fn_with_state(allow([Method::GET]), method_guard)),
        )
        .route(
            "/api/v1/geofence",
            get(geofence::show)
                .put(geofence::update)
                .layer(from_fn_with_state(allow([Method::GET, Method::PUT]), method_guard)),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{generate_jwt, Claims};
    use crate::testing::{employee, mumbai_office, sample_location};

    async fn app() -> (Router, String) {
        let config = AppConfig::development();
        let token = generate_jwt(&Claims::new("jane@example.com", 1), &config.security.jwt_secret).unwrap();

        let store = Arc::new(MemoryStore::new());
        store.add_employee(employee("EMP-001", "jane@example.com")).await;
        store.replace(mumbai_office()).await.unwrap();

        (router(AppState::in_memory(config, store)), token)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn token_is_checked_before_method() {
        let (app, _) = app().await;
        let request = Request::get("/api/v1/location").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status_code"], 401);
    }

    #[tokio::test]
    async fn wrong_method_gets_the_envelope() {
        let (app, token) = app().await;
        let request = Request::get("/api/v1/location")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"status_code": 500, "message": "Invalid Request Method", "data": []})
        );
    }

    #[tokio::test]
    async fn submission_outside_fence_still_succeeds() {
        let (app, token) = app().await;
        let request = Request::post("/api/v1/location")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"location": sample_location(), "date": "2024-01-10"}).to_string()))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Location updated successfully.");
    }

    #[tokio::test]
    async fn body_without_json_content_type_counts_as_missing() {
        let (app, token) = app().await;
        let request = Request::post("/api/v1/location")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from("location=abc"))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "location is required.");
    }
}
