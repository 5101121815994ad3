//! `DolarApi` client for Venezuelan dollar rates.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tanuki_core::RateEntry;
use url::Url;

use super::{RateError, RateSource};
use crate::config::AdminConfig;

/// Longest error body kept in `RateError::Api`.
const MAX_ERROR_BODY: usize = 512;

/// Client for the `GET /v1/dolares` endpoint.
#[derive(Debug, Clone)]
pub struct DolarApiClient {
    client: reqwest::Client,
    url: Url,
}

impl DolarApiClient {
    /// Create a client for `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, RateError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("tanuki-admin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    /// Create a client from the admin configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &AdminConfig) -> Result<Self, RateError> {
        Self::new(config.rates_url.clone(), config.http_timeout)
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl RateSource for DolarApiClient {
    async fn fetch_entries(&self) -> Result<Vec<RateEntry>, RateError> {
        tracing::debug!(url = %self.url, "Fetching exchange rates");

        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| message.is_char_boundary(i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(RateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let entries: Vec<RateEntry> =
            serde_json::from_str(&body).map_err(|e| RateError::Parse(e.to_string()))?;

        tracing::debug!(entries = entries.len(), "Exchange rates received");
        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> DolarApiClient {
        let url = Url::parse(&format!("{}/v1/dolares", server.uri())).unwrap();
        DolarApiClient::new(url, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_entries_parses_dolarapi_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dolares"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "fuente": "oficial",
                    "nombre": "Oficial",
                    "compra": null,
                    "venta": null,
                    "promedio": 36.52,
                    "fechaActualizacion": "2026-03-14T12:00:00.000Z"
                },
                {
                    "fuente": "paralelo",
                    "nombre": "Paralelo",
                    "promedio": 40.1,
                    "fechaActualizacion": "2026-03-14T12:00:00.000Z"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let entries = client_for(&server).await.fetch_entries().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].promedio, Some(Decimal::new(3652, 2)));
        assert_eq!(entries[1].nombre.as_deref(), Some("Paralelo"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_entries().await.unwrap_err();
        assert!(matches!(err, RateError::Api { status: 503, ref message } if message == "maintenance"));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "nope"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_entries().await.unwrap_err();
        assert!(matches!(err, RateError::Parse(_)));
    }

    #[test]
    fn test_from_config_uses_configured_url() {
        let config = AdminConfig::from_lookup(|_| None).unwrap();
        let client = DolarApiClient::from_config(&config).unwrap();
        assert_eq!(client.url().as_str(), crate::config::DEFAULT_RATES_URL);
    }
}
