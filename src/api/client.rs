//! HTTP client for registry API endpoints

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::{Result, SigningError};

use super::endpoint::{ApiEndpoint, DualDigitalCertificates, PATCH_COMPOSE_FINAL_DOCUMENT_DUAL_DIGITAL};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Scheme and host of the back end, e.g. `https://rece.example.org`
    pub base_url: String,
    /// Timeout for HTTP requests (default: 30 seconds)
    pub request_timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Executes endpoint descriptors over HTTP
pub struct RegistryApiClient {
    config: ApiClientConfig,
    http_client: reqwest::Client,
}

impl RegistryApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("acte-signing/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Full URL of an endpoint with its path parameters filled in
    pub fn url_for<B, R>(&self, endpoint: &ApiEndpoint<B, R>, params: &[(&str, &str)]) -> Result<String>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let path = endpoint.render_uri(params)?;
        Ok(format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.api.prefix(),
            path
        ))
    }

    /// Send `body` to `endpoint` and decode the response
    pub async fn execute<B, R>(
        &self,
        endpoint: &ApiEndpoint<B, R>,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url_for(endpoint, params)?;
        debug!(method = %endpoint.method, url = %url, "Calling registry API");

        let response = self
            .http_client
            .request(endpoint.method.into(), &url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(method = %endpoint.method, url = %url, status = status.as_u16(), "Registry API error");
            return Err(SigningError::Status {
                method: endpoint.method.as_str(),
                uri: url,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        decode_body(&text)
    }

    /// Compose the final document of a dual-digital signature
    pub async fn compose_final_document(
        &self,
        act_id: Uuid,
        certificates: &DualDigitalCertificates,
    ) -> Result<String> {
        let act_id = act_id.to_string();
        self.execute(
            &PATCH_COMPOSE_FINAL_DOCUMENT_DUAL_DIGITAL,
            &[("idActe", act_id.as_str())],
            certificates,
        )
        .await
    }
}

/// Decode a JSON response body.
///
/// String responses are often sent unquoted; a body that is not valid JSON
/// is taken verbatim when a string is expected.
fn decode_body<R: DeserializeOwned>(text: &str) -> Result<R> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) => serde_json::from_value(serde_json::Value::String(text.to_string()))
            .map_err(|_| SigningError::Decode(e.to_string())),
    }
}
