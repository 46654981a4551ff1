#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use ess_mobile_api::app::{router, AppState};
use ess_mobile_api::auth::{generate_jwt, Claims};
use ess_mobile_api::config::AppConfig;
use ess_mobile_api::database::models::Employee;
use ess_mobile_api::location::MemoryStore;
use serde_json::{json, Value};

pub const SECRET: &str = "integration-secret";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    client: reqwest::Client,
}

impl TestServer {
    /// Serve the full router over the in-memory store on a free port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.security.jwt_secret = SECRET.to_string();
        config.api.enable_request_logging = false;

        let store = Arc::new(MemoryStore::new());
        let app = router(AppState::in_memory(config.clone(), store.clone()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        Ok(Self {
            base_url,
            store,
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn add_employee(&self, name: &str, user_id: &str) {
        self.store
            .add_employee(Employee {
                name: name.to_string(),
                user_id: user_id.to_string(),
                employee_name: None,
                company: Some("Acme".to_string()),
            })
            .await;
    }
}

pub fn token_for(user: &str) -> String {
    generate_jwt(&Claims::new(user, 1), SECRET).expect("token")
}

pub fn sample_location() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": [
                    [72.855663, 19.080709],
                    [72.871113, 19.09531],
                    [72.873344, 19.078438],
                    [72.86459, 19.067731],
                    [72.848454, 19.073084],
                    [72.854633, 19.081521],
                    [72.840214, 19.105204]
                ]
            }
        }]
    })
}
