//! AI generation client.
//!
//! The generation service receives the composited PNG and answers with an
//! enhanced image. Wire format (JSON over HTTPS):
//!
//! ```text
//! POST <endpoint>
//! { "mime_type": "image/png", "image_base64": "..." }
//!
//! 200 OK
//! { "image_base64": "..." }
//! ```
//!
//! The client never retries on its own; retry is a user action.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use kolam_renderer::PNG_MIME_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Longest response body excerpt kept in errors.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors that can occur when talking to the generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The endpoint URL provided is invalid.
    #[error("invalid generation service URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("generation HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("generation service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },
    /// JSON parsing failed.
    #[error("failed to parse generation payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The image payload was not valid base64.
    #[error("generation payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The response did not match the expected structure.
    #[error("unexpected generation response: {0}")]
    UnexpectedResponse(String),
    /// No service is configured.
    #[error("no generation service configured")]
    NotConfigured,
}

/// Something that turns a capture into an enhanced image.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send the encoded capture and return the generated image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] for any transport, status or payload failure.
    async fn generate(&self, png: &[u8]) -> Result<Vec<u8>, GenerationError>;
}

/// Service used when no endpoint is configured. Every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredService;

#[async_trait]
impl GenerationService for UnconfiguredService {
    async fn generate(&self, _png: &[u8]) -> Result<Vec<u8>, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

/// HTTP client for a JSON generation endpoint.
#[derive(Clone)]
pub struct HttpGenerationService {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpGenerationService {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidUrl`] if the URL is malformed.
    /// Returns [`GenerationError::Http`] if the HTTP client fails to build.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| GenerationError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent(concat!("kolam-studio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                api_key: api_key.filter(|k| !k.is_empty()),
            }),
        })
    }

    /// Configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

impl std::fmt::Debug for HttpGenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerationService")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("api_key", &self.inner.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    mime_type: &'a str,
    image_base64: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    image_base64: Option<String>,
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, png: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let engine = base64::engine::general_purpose::STANDARD;
        let request = GenerateRequest {
            mime_type: PNG_MIME_TYPE,
            image_base64: engine.encode(png),
        };

        tracing::debug!(
            endpoint = %self.inner.endpoint,
            bytes = png.len(),
            "sending capture to generation service"
        );

        let mut builder = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(&request);
        if let Some(key) = &self.inner.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let body: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        let encoded = parsed.image_base64.ok_or_else(|| {
            GenerationError::UnexpectedResponse("missing image_base64".to_string())
        })?;
        let image = if encoded.starts_with("data:") {
            kolam_renderer::decode_data_uri(&encoded)
                .map_err(|e| GenerationError::UnexpectedResponse(e.to_string()))?
        } else {
            engine.decode(encoded.trim())?
        };
        if image.is_empty() {
            return Err(GenerationError::UnexpectedResponse(
                "empty image".to_string(),
            ));
        }

        tracing::debug!(bytes = image.len(), "generation service returned image");
        Ok(image)
    }
}
