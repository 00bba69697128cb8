//! External OCR fallback.
//!
//! The pipeline performs no OCR itself: when native PDF text extraction
//! fails it can delegate to an OCR sidecar over HTTP. The provider is a
//! trait so tests substitute a deterministic stub instead of a live
//! network dependency.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::OcrError;

/// Pluggable OCR capability. Implementations must be safe to share across
/// concurrent ingestion calls.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Extract plain text from raw PDF bytes.
    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, OcrError>;
}

/// Configuration for the HTTP OCR sidecar, read from the environment the
/// way the rest of the deployment is configured.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://ocr:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OcrConfig {
    /// Read `OCR_ENABLED`, `OCR_SERVICE_URL` and `OCR_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let enabled = std::env::var("OCR_ENABLED")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.enabled);
        let endpoint = std::env::var("OCR_SERVICE_URL").unwrap_or(defaults.endpoint);
        let timeout = std::env::var("OCR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            enabled,
            endpoint,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: Option<String>,
}

/// OCR sidecar client: POSTs the PDF as multipart form data to
/// `<endpoint>/extract` and expects a JSON body with the extracted `text`.
/// The client carries a bounded timeout so a hung sidecar fails the call
/// instead of hanging the pipeline.
pub struct HttpOcrProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl OcrProvider for HttpOcrProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, OcrError> {
        use reqwest::multipart::{Form, Part};

        let part = Part::bytes(pdf_bytes.to_vec())
            .file_name("document.pdf")
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/extract", self.endpoint))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status { status, body });
        }

        let parsed: OcrResponse = response.json().await?;
        match parsed.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(OcrError::MissingText),
        }
    }
}
