//! [`DocumentClient`]: both operations behind one transport.
//!
//! This is the surface a front end talks to: `extract(file) -> String` and
//! `convert(text, format, filename) -> BinaryArtifact`, each failing with a
//! single displayable [`ApiError`]. The two underlying clients share the
//! transport but nothing else, so concurrent calls are independent.

use crate::artifact::BinaryArtifact;
use crate::config::ClientConfig;
use crate::convert::{ConversionClient, ConversionRequest};
use crate::error::{ApiError, ConfigError};
use crate::extract::{ExtractionClient, UploadRequest};
use crate::format::OutputFormat;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

/// Extraction and conversion against one service.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    extraction: ExtractionClient,
    conversion: ConversionClient,
}

impl DocumentClient {
    /// Client over HTTP using `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Client over any [`Transport`], e.g. a test double.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            extraction: ExtractionClient::new(Arc::clone(&transport)),
            conversion: ConversionClient::new(transport, config),
        }
    }

    /// Upload `file` and return the extracted text (possibly empty).
    pub async fn extract(&self, file: UploadRequest) -> Result<String, ApiError> {
        self.extraction
            .extract(file)
            .await
            .map(|result| result.extracted_text)
    }

    /// Convert `text` to `format`, naming the output `filename`.
    pub async fn convert(
        &self,
        text: impl Into<String>,
        format: impl Into<OutputFormat>,
        filename: impl Into<String>,
    ) -> Result<BinaryArtifact, ApiError> {
        self.conversion
            .convert(ConversionRequest::new(text, format, filename))
            .await
    }

    pub fn extraction(&self) -> &ExtractionClient {
        &self.extraction
    }

    pub fn conversion(&self) -> &ConversionClient {
        &self.conversion
    }
}
