//! # doctext
//!
//! Client for a remote text-extraction and format-conversion service.
//!
//! Upload a document, get its text back, then have that text re-encoded as
//! a plain-text, PDF, word-processor or image file. The service does the
//! OCR and the rendering; this crate owns the wire protocol: multipart
//! uploads, JSON conversion requests, base64 file payloads, and turning the
//! service's inconsistent failure bodies into one error type.
//!
//! ## Flows
//!
//! ```text
//! file ──▶ ExtractionClient ──▶ POST /extract-text ──▶ {extractedText}
//!
//! text ──▶ ConversionClient ──▶ POST /convert ──▶ {fileData, mimeType}
//!                                                   │
//!                                      base64 ──▶ BinaryArtifact
//! ```
//!
//! Both clients go through the [`Transport`] trait. [`HttpTransport`] is the
//! `reqwest` implementation; anything else (a mock, a recording proxy) can be
//! plugged in with [`DocumentClient::with_transport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doctext::{ClientConfig, DocumentClient, OutputFormat, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DocumentClient::new(&ClientConfig::from_env()?)?;
//!
//!     let file = UploadRequest::from_path("scan.png").await?;
//!     let text = client.extract(file).await?;
//!
//!     let artifact = client.convert(text, OutputFormat::Pdf, "scan").await?;
//!     artifact.save_to("scan.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doctext` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! No call is ever retried. Every failure is an [`ApiError`] whose `Display`
//! is a complete sentence suitable for showing to a user.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod format;
pub mod normalize;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::{assemble_file_data, sanitize_stem, suggested_file_name, BinaryArtifact};
pub use client::DocumentClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use convert::{ConversionClient, ConversionRequest, ConversionResponse};
pub use error::{ApiError, ConfigError, ErrorKind, Operation};
pub use extract::{ExtractionClient, ExtractionResult, UploadRequest};
pub use format::OutputFormat;
pub use normalize::ErrorNormalizer;
pub use transport::{HttpTransport, RequestBody, Transport, TransportError, TransportRequest, TransportResponse};
