//! Error types for the doctext client.
//!
//! Two distinct error types reflect two distinct failure moments:
//!
//! * [`ApiError`] — a single extraction or conversion call failed. Every
//!   variant renders as one human-readable line prefixed with the operation
//!   (`"Failed to extract text from file: …"`), so a front end can show
//!   `err.to_string()` without inspecting the variant.
//!
//! * [`ConfigError`] — the client could not be constructed at all (bad base
//!   URL, zero timeout). Returned from
//!   [`crate::config::ClientConfigBuilder::build`] and
//!   [`crate::transport::HttpTransport::new`].
//!
//! No variant is retried and none is fatal: each call fails on its own and
//! the client is immediately ready for the next attempt.

use crate::format::OutputFormat;
use std::fmt;
use thiserror::Error;

/// Which client operation produced an error.
///
/// Its `Display` form is the prefix of every [`ApiError`] message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `POST /extract-text`
    Extract,
    /// `POST /convert` with the requested target format.
    Convert(OutputFormat),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Extract => f.write_str("Failed to extract text from file"),
            Operation::Convert(format) => write!(f, "Failed to convert text to {format}"),
        }
    }
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected client-side; no request was sent.
    Validation,
    /// HTTP succeeded but the body broke the response contract.
    Protocol,
    /// The service answered with a non-success status.
    Remote,
    /// No usable response was received.
    Transport,
}

/// A failed extraction or conversion call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected before any network call.
    #[error("{op}: {message}")]
    Validation { op: Operation, message: String },

    /// The service returned success but the payload is unusable
    /// (missing or empty `fileData`, undecodable JSON or base64).
    #[error("{op}: {message}")]
    Protocol { op: Operation, message: String },

    /// The service returned a non-success status. `message` is whatever the
    /// [`crate::normalize::ErrorNormalizer`] recovered from the body.
    #[error("{op}: API request failed with status {status}: {message}")]
    Remote {
        op: Operation,
        status: u16,
        message: String,
    },

    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    #[error("{op}: {message}")]
    Transport { op: Operation, message: String },
}

impl ApiError {
    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Protocol { .. } => ErrorKind::Protocol,
            ApiError::Remote { .. } => ErrorKind::Remote,
            ApiError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// HTTP status of the failed response, when one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The operation that failed.
    pub fn operation(&self) -> &Operation {
        match self {
            ApiError::Validation { op, .. }
            | ApiError::Protocol { op, .. }
            | ApiError::Remote { op, .. }
            | ApiError::Transport { op, .. } => op,
        }
    }

    /// The underlying message without the operation prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Protocol { message, .. }
            | ApiError::Remote { message, .. }
            | ApiError::Transport { message, .. } => message,
        }
    }
}

/// The client could not be configured.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL does not parse or is not HTTP/HTTPS.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A numeric setting is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built (TLS backend, etc.).
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_prefix_display() {
        let e = ApiError::Transport {
            op: Operation::Extract,
            message: "connection refused".into(),
        };
        assert_eq!(
            e.to_string(),
            "Failed to extract text from file: connection refused"
        );
        assert_eq!(e.kind(), ErrorKind::Transport);
        assert_eq!(e.http_status(), None);
    }

    #[test]
    fn convert_prefix_names_format() {
        let e = ApiError::Validation {
            op: Operation::Convert(OutputFormat::Pdf),
            message: "No text to convert".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to convert text to pdf"), "got: {msg}");
        assert!(msg.ends_with("No text to convert"), "got: {msg}");
    }

    #[test]
    fn remote_carries_status() {
        let e = ApiError::Remote {
            op: Operation::Convert(OutputFormat::Doc),
            status: 503,
            message: "Status 503".into(),
        };
        assert_eq!(e.http_status(), Some(503));
        assert_eq!(e.kind(), ErrorKind::Remote);
        assert_eq!(e.message(), "Status 503");
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::InvalidBaseUrl {
            url: "ftp://x".into(),
            reason: "scheme must be http or https".into(),
        };
        assert!(e.to_string().contains("ftp://x"));
    }
}
