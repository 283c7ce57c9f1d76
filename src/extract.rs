//! Text extraction: upload a file, get its text back.
//!
//! One multipart `POST /extract-text` per call, field `file`. The service
//! answers `{"extractedText": "..."}` on success. A missing field means the
//! service found no text, which is a valid (empty) result rather than an
//! error; deciding whether an empty document is a problem is the caller's
//! business.

use crate::error::{ApiError, Operation};
use crate::normalize::{self, ErrorNormalizer};
use crate::transport::{Transport, TransportRequest};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Multipart field name the service reads the upload from.
pub const FILE_FIELD: &str = "file";

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file, guessing its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, media_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Text returned by the service, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "extractedText")]
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(rename = "extractedText", default)]
    extracted_text: Option<String>,
}

/// Client for `POST /extract-text`.
#[derive(Clone)]
pub struct ExtractionClient {
    transport: Arc<dyn Transport>,
    normalizer: ErrorNormalizer,
}

impl ExtractionClient {
    /// Endpoint path below the base URL.
    pub const ENDPOINT: &'static str = "extract-text";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            normalizer: ErrorNormalizer::for_extraction(),
        }
    }

    /// Upload `file` and return the text the service extracted from it.
    ///
    /// # Errors
    /// * [`ApiError::Transport`] — no response was received
    /// * [`ApiError::Remote`] — non-2xx status; the message is the raw body
    /// * [`ApiError::Protocol`] — a 2xx body that is not the expected JSON
    pub async fn extract(&self, file: UploadRequest) -> Result<ExtractionResult, ApiError> {
        let op = Operation::Extract;
        info!(
            "Sending file to backend: {} ({}, {} bytes)",
            file.file_name,
            file.media_type,
            file.bytes.len()
        );

        let request = TransportRequest::multipart(
            Self::ENDPOINT,
            FILE_FIELD,
            file.file_name,
            file.media_type,
            file.bytes,
        );
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| normalize::transport(op.clone(), e))?;

        debug!("Extraction response status: {}", response.status);

        if !response.is_success() {
            return Err(self.normalizer.remote(op, &response));
        }

        let body: ExtractResponse = response
            .json()
            .map_err(|e| normalize::protocol(op, format!("Invalid JSON in response: {e}")))?;

        let extracted_text = body.extracted_text.unwrap_or_default();
        info!("Text extraction successful: {} chars", extracted_text.len());
        Ok(ExtractionResult { extracted_text })
    }
}

impl std::fmt::Debug for ExtractionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionClient")
            .field("transport", &"<dyn Transport>")
            .field("normalizer", &self.normalizer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_accessors() {
        let u = UploadRequest::new("a.txt", "text/plain", b"0123456789".to_vec());
        assert_eq!(u.file_name(), "a.txt");
        assert_eq!(u.media_type(), "text/plain");
        assert_eq!(u.len(), 10);
        assert!(!u.is_empty());
    }

    #[tokio::test]
    async fn from_path_guesses_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let u = UploadRequest::from_path(&path).await.unwrap();
        assert_eq!(u.file_name(), "scan.png");
        assert_eq!(u.media_type(), "image/png");
        assert_eq!(u.len(), 4);
    }

    #[tokio::test]
    async fn from_path_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        std::fs::write(&path, b"x").unwrap();

        let u = UploadRequest::from_path(&path).await.unwrap();
        assert_eq!(u.media_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn from_path_missing_file_errors() {
        let err = UploadRequest::from_path("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn missing_field_deserializes_to_none() {
        let r: ExtractResponse = serde_json::from_str("{}").unwrap();
        assert!(r.extracted_text.is_none());
        let r: ExtractResponse = serde_json::from_str(r#"{"extractedText":null}"#).unwrap();
        assert!(r.extracted_text.is_none());
    }

    #[test]
    fn result_serializes_with_wire_name() {
        let r = ExtractionResult {
            extracted_text: "hello text".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({ "extractedText": "hello text" }));
    }
}
