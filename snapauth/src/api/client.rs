use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::types::WireResponse;
use crate::config::{SNAPAUTH_API_URL, SNAPAUTH_HTTP_TIMEOUT};
use crate::errors::SnapAuthError;

/// Errors raised below the envelope layer.
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request URL: {0}")]
    Url(String),
}

/// Delivery of one request to the relying-party backend.
///
/// Implementations own connection handling and authorization; callers only
/// see raw response bytes. The coordinator never calls this directly, it
/// goes through [`ApiClient`] so every response passes envelope decoding.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// HTTPS transport with per-instance basic authorization.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    authorization: String,
}

impl HttpTransport {
    /// Creates a transport for the configured API base URL.
    pub fn new(publishable_key: &str) -> Self {
        let base_url =
            Url::parse(&SNAPAUTH_API_URL).expect("SNAPAUTH_API_URL must be a valid URL");
        Self::with_base_url(publishable_key, base_url)
    }

    pub fn with_base_url(publishable_key: &str, base_url: Url) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*SNAPAUTH_HTTP_TIMEOUT))
            .build()
            .expect("Failed to create reqwest client");
        Self {
            client,
            base_url,
            authorization: basic_authorization(publishable_key),
        }
    }
}

/// Auth header generation: `Basic base64("<key>:")`.
fn basic_authorization(publishable_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{publishable_key}:")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::Url(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.authorization.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        // Refusals still carry an envelope body, so the status code is not
        // consulted here.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Internal API call wrapper
///
/// Serializes the request body, posts it over the transport, and decodes
/// the `{result, errors}` envelope into either the unwrapped result or a
/// mapped [`SnapAuthError`].
pub(crate) struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub(crate) fn new(publishable_key: &str) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new(publishable_key)),
        }
    }

    pub(crate) fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, SnapAuthError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        // Local serialization failure is detected before any network call.
        let json = serde_json::to_vec(body).map_err(|e| {
            tracing::error!("Failed to encode request body for {path}: {e}");
            SnapAuthError::EncodingFailure
        })?;
        tracing::debug!("--> POST {path} {}", String::from_utf8_lossy(&json));

        let raw = self.transport.post(path, json).await?;
        tracing::debug!("<-- {}", String::from_utf8_lossy(&raw));

        let parsed: WireResponse<T> = serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!("Failed to decode response envelope from {path}: {e}");
            SnapAuthError::MalformedResponse
        })?;

        match parsed.result {
            Some(result) => Ok(result),
            None => match parsed.errors.unwrap_or_default().first() {
                Some(declared) => {
                    tracing::warn!(
                        "Backend declared error {} on {path}: {}",
                        declared.code,
                        declared.message
                    );
                    Err(map_error_code(&declared.code))
                }
                // The wire contract guarantees a result or at least one
                // error; neither means the response is broken.
                None => Err(SnapAuthError::MalformedResponse),
            },
        }
    }
}

/// Fixed mapping from backend-declared error codes to the public taxonomy.
///
/// Every documented code is a refusal of the request; codes this SDK does
/// not recognize collapse to the same kind with the code preserved for
/// caller-side inspection.
fn map_error_code(code: &str) -> SnapAuthError {
    SnapAuthError::RejectedRequest(code.to_string())
}
