//! Network seam for the API layer
//!
//! The portal is a single HTTP GET endpoint that dispatches on an `action`
//! query parameter. Everything above the socket goes through the `Transport`
//! trait so the request cache and the asset store can be exercised in tests
//! with scripted responses instead of a live server.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use super::ApiError;

/// Fallback portal endpoint when `LEAVEDESK_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://leave-portal.example.com/api/exec";

/// Environment variable overriding the portal endpoint
pub const API_URL_ENV: &str = "LEAVEDESK_API_URL";

/// Resolves the portal endpoint from the environment
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Abstraction over the portal's wire protocol
pub trait Transport {
    /// Performs `GET <base>?action=<action>&<params>` and decodes the JSON body
    fn get_json(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Performs `GET <base>?action=<action>&<params>` and returns the raw
    /// body (report downloads)
    fn download(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;

    /// Fetches an absolute URL and returns the raw body (static assets)
    fn get_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// `Transport` implementation over reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport against the given portal endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("leavedesk"));

        // The builder only errors on TLS backend misconfiguration.
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The configured portal endpoint
    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn get_json(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", action)])
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Network(format!("HTTP {} from {}", status, action)));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Network(format!("invalid JSON body: {}", e)))
    }

    async fn download(&self, action: &str, params: &[(String, String)]) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", action)])
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Network(format!("HTTP {} from {}", status, action)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Network(format!("HTTP {} from {}", status, url)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
