//! End-to-end tests for the Tanuki Shop admin tool.
//!
//! Each test gets a throwaway data directory and a mock rate endpoint, and
//! opens [`AppState`] the same way the CLI does. Reopening the state from
//! the same directory simulates a new session.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tanuki-integration-tests
//! ```

use std::path::Path;

use serde_json::{Value, json};
use tanuki_admin::{AdminConfig, AppState};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock server answers rate requests on.
pub const RATES_PATH: &str = "/v1/dolares";

/// A mock rate endpoint plus a data directory.
pub struct TestContext {
    pub server: MockServer,
    pub data_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            data_dir: tempfile::tempdir().expect("Failed to create data directory"),
        }
    }

    /// Configuration pointing at this context's server and directory.
    #[must_use]
    pub fn config(&self) -> AdminConfig {
        let rates_url = format!("{}{RATES_PATH}", self.server.uri());
        let data_dir = self.data_dir.path().display().to_string();
        AdminConfig::from_lookup(|key| match key {
            "TANUKI_RATES_URL" => Some(rates_url.clone()),
            "TANUKI_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .expect("Test configuration is valid")
    }

    /// Start a new session on the shared data directory.
    #[must_use]
    pub fn open(&self) -> AppState {
        AppState::from_config(self.config()).expect("Failed to open state")
    }

    /// Answer every rate request with `bcv` and `paralelo`.
    pub async fn mock_rates(&self, bcv: f64, paralelo: f64) {
        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(dolares_body(bcv, paralelo)))
            .mount(&self.server)
            .await;
    }

    /// Parsed contents of the stored value for `key`, if any.
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<Value> {
        read_json(&self.data_dir.path().join(format!("{key}.json")))
    }

    /// Write a raw stored value, as an older session would have left it.
    pub fn seed(&self, key: &str, value: &Value) {
        std::fs::write(
            self.data_dir.path().join(format!("{key}.json")),
            value.to_string(),
        )
        .expect("Failed to seed stored value");
    }
}

/// A `/v1/dolares` response body with the official and parallel rates.
#[must_use]
pub fn dolares_body(bcv: f64, paralelo: f64) -> Value {
    json!([
        {
            "fuente": "oficial",
            "nombre": "Oficial",
            "compra": null,
            "venta": null,
            "promedio": bcv,
            "fechaActualizacion": "2026-10-19T13:00:00.000Z"
        },
        {
            "fuente": "paralelo",
            "nombre": "Paralelo",
            "compra": null,
            "venta": null,
            "promedio": paralelo,
            "fechaActualizacion": "2026-10-19T13:05:00.000Z"
        }
    ])
}

fn read_json(path: &Path) -> Option<Value> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}
