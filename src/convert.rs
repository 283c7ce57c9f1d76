//! Format conversion: send text, get a file back.
//!
//! `POST /convert` takes `{text, format, filename}` as JSON and answers with
//! the converted file embedded as base64:
//!
//! ```text
//! {"fileData": "<base64>", "mimeType": "application/pdf"}
//! ```
//!
//! A 200 is not enough to call the conversion a success. A missing
//! `fileData`, undecodable base64, or a payload that decodes to zero bytes
//! are all reported as protocol errors so a silently-failed conversion never
//! reaches the user as an empty download.

use crate::artifact::{assemble_file_data, BinaryArtifact};
use crate::config::ClientConfig;
use crate::error::{ApiError, Operation};
use crate::format::OutputFormat;
use crate::normalize::{self, ErrorNormalizer};
use crate::transport::{Transport, TransportRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Media type used when neither the response nor the format names one.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Text to convert and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub text: String,
    pub format: OutputFormat,
    /// Base name for the produced file; blank means the configured default.
    pub filename: String,
}

impl ConversionRequest {
    pub fn new(
        text: impl Into<String>,
        format: impl Into<OutputFormat>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            format: format.into(),
            filename: filename.into(),
        }
    }
}

/// Success body of `POST /convert`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionResponse {
    #[serde(rename = "fileData", default)]
    pub file_data: Option<String>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
}

/// Client for `POST /convert`.
#[derive(Clone)]
pub struct ConversionClient {
    transport: Arc<dyn Transport>,
    normalizer: ErrorNormalizer,
    decode_window: usize,
    default_filename: String,
}

impl ConversionClient {
    /// Endpoint path below the base URL.
    pub const ENDPOINT: &'static str = "convert";

    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            normalizer: ErrorNormalizer::for_conversion(),
            decode_window: config.decode_window.max(1),
            default_filename: config.default_filename.clone(),
        }
    }

    /// Convert `req.text` into `req.format` and return the decoded file.
    ///
    /// Blank text is rejected before any request is made.
    ///
    /// # Errors
    /// * [`ApiError::Validation`] — `"No text to convert"`
    /// * [`ApiError::Transport`] — no response was received
    /// * [`ApiError::Remote`] — non-2xx status (JSON `error` → body text → `Status <code>`)
    /// * [`ApiError::Protocol`] — `"Response missing file data"`,
    ///   `"Received empty file data"`, or an undecodable body
    pub async fn convert(&self, req: ConversionRequest) -> Result<BinaryArtifact, ApiError> {
        let op = Operation::Convert(req.format.clone());

        if req.text.trim().is_empty() {
            return Err(ApiError::Validation {
                op,
                message: "No text to convert".to_string(),
            });
        }

        let filename = if req.filename.trim().is_empty() {
            self.default_filename.as_str()
        } else {
            req.filename.as_str()
        };
        info!("Converting text to {} format for file {}", req.format, filename);

        let body = serde_json::json!({
            "text": req.text,
            "format": req.format.as_str(),
            "filename": filename,
        });
        let response = self
            .transport
            .send(TransportRequest::json(Self::ENDPOINT, body))
            .await
            .map_err(|e| normalize::transport(op.clone(), e))?;

        debug!("Conversion response status: {}", response.status);

        if !response.is_success() {
            return Err(self.normalizer.remote(op, &response));
        }

        let data: ConversionResponse = response
            .json()
            .map_err(|e| normalize::protocol(op.clone(), format!("Invalid JSON in response: {e}")))?;

        let Some(file_data) = data.file_data else {
            return Err(normalize::protocol(op, "Response missing file data"));
        };

        let bytes = assemble_file_data(&file_data, self.decode_window)
            .map_err(|e| normalize::protocol(op.clone(), format!("Malformed file data: {e}")))?;
        if bytes.is_empty() {
            return Err(normalize::protocol(op, "Received empty file data"));
        }

        let mime_type = data
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .or_else(|| req.format.default_mime_type().map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        info!("Conversion successful: {} bytes ({})", bytes.len(), mime_type);
        Ok(BinaryArtifact { bytes, mime_type })
    }
}

impl std::fmt::Debug for ConversionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionClient")
            .field("transport", &"<dyn Transport>")
            .field("decode_window", &self.decode_window)
            .field("default_filename", &self.default_filename)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _: TransportRequest) -> Result<TransportResponse, TransportError> {
            panic!("blank text must not reach the transport");
        }
    }

    #[test]
    fn blank_text_fails_before_sending() {
        let client = ConversionClient::new(Arc::new(Unreachable), &ClientConfig::default());
        let err = tokio_test::block_on(client.convert(ConversionRequest::new(" \n", "txt", "")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Failed to convert text to txt: No text to convert");
    }

    #[test]
    fn request_accepts_str_format() {
        let r = ConversionRequest::new("hi", "PDF", "notes");
        assert_eq!(r.format, OutputFormat::Pdf);
    }

    #[test]
    fn response_fields_are_optional() {
        let r: ConversionResponse = serde_json::from_str("{}").unwrap();
        assert!(r.file_data.is_none());
        assert!(r.mime_type.is_none());

        let r: ConversionResponse =
            serde_json::from_str(r#"{"fileData":"aGk=","mimeType":"text/plain"}"#).unwrap();
        assert_eq!(r.file_data.as_deref(), Some("aGk="));
        assert_eq!(r.mime_type.as_deref(), Some("text/plain"));
    }
}
