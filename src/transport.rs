//! HTTP transport seam.
//!
//! Both clients talk to the service exclusively through the [`Transport`]
//! trait: they build a [`TransportRequest`], await one
//! [`TransportResponse`], and interpret it. [`HttpTransport`] is the
//! production implementation on top of `reqwest`; tests substitute an
//! in-process double or point `HttpTransport` at a mock server.
//!
//! A transport never interprets status codes. A 500 with an HTML body is a
//! successful *transport* round trip; only "no response at all" is a
//! [`TransportError`].

use crate::config::ClientConfig;
use crate::error::ConfigError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// A `multipart/form-data` body with a single file field.
    Multipart {
        field: String,
        file_name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
    /// A JSON body, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
}

/// A `POST` to an endpoint below the configured base URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Endpoint path relative to the base URL, e.g. `"convert"`.
    pub path: String,
    pub body: RequestBody,
}

impl TransportRequest {
    pub fn json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            body: RequestBody::Json(body),
        }
    }

    pub fn multipart(
        path: impl Into<String>,
        field: impl Into<String>,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            path: path.into(),
            body: RequestBody::Multipart {
                field: field.into(),
                file_name: file_name.into(),
                media_type: media_type.into(),
                bytes,
            },
        }
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// No usable response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("cannot connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("request could not be built: {0}")]
    InvalidRequest(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

/// Issues one HTTP request and returns the complete response.
///
/// Implementations must be `Send + Sync`: a client may serve several
/// concurrent calls through one shared transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport honouring the configured base URL and timeouts.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("doctext/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                secs: self.config.timeout().as_secs(),
            }
        } else if e.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.config.endpoint(&request.path);
        let builder = self.client.post(&url);

        let builder = match request.body {
            RequestBody::Multipart {
                field,
                file_name,
                media_type,
                bytes,
            } => {
                debug!("POST {} multipart ({} bytes)", url, bytes.len());
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&media_type)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                builder.multipart(Form::new().part(field, part))
            }
            RequestBody::Json(value) => {
                debug!("POST {} json", url);
                builder.json(&value)
            }
        };

        let response = builder.send().await.map_err(|e| self.map_error(&url, e))?;

        let status = response.status().as_u16();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.clone(),
                    secs: self.config.timeout().as_secs(),
                }
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        debug!("{} → {} ({} bytes)", url, status, body.len());

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
