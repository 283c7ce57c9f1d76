//! Turning failed round trips into one [`ApiError`].
//!
//! The service is not consistent about failure bodies: validation errors come
//! back as JSON `{"error": "..."}`, infrastructure errors as whatever the
//! proxy in front of it emits (HTML, plain text, nothing). An
//! [`ErrorNormalizer`] is an ordered list of [`Extractor`]s; the first one
//! that recovers a message wins, and `"Status <code>"` is the last resort.
//!
//! The two endpoints use different chains:
//!
//! | Endpoint  | Chain |
//! |-----------|-------|
//! | `/convert`      | [`json_error_field`] → [`raw_text`] → `Status <code>` |
//! | `/extract-text` | [`raw_text`] → `Status <code>` |

use crate::error::{ApiError, Operation};
use crate::transport::{TransportError, TransportResponse};
use tracing::warn;

/// Tries to recover a human-readable message from a failed response.
pub type Extractor = fn(&TransportResponse) -> Option<String>;

/// The `error` string of a JSON object body.
pub fn json_error_field(response: &TransportResponse) -> Option<String> {
    let value: serde_json::Value = response.json().ok()?;
    let message = value.get("error")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// The raw body text, untouched, if it is not blank.
pub fn raw_text(response: &TransportResponse) -> Option<String> {
    let text = response.text();
    (!text.trim().is_empty()).then_some(text)
}

/// Ordered "first match wins" message extraction.
#[derive(Debug, Clone)]
pub struct ErrorNormalizer {
    extractors: Vec<Extractor>,
}

impl ErrorNormalizer {
    pub fn new(extractors: Vec<Extractor>) -> Self {
        Self { extractors }
    }

    /// Chain for `/extract-text`: raw text only.
    pub fn for_extraction() -> Self {
        Self::new(vec![raw_text])
    }

    /// Chain for `/convert`: JSON `error`, then raw text.
    pub fn for_conversion() -> Self {
        Self::new(vec![json_error_field, raw_text])
    }

    /// The first message any extractor recovers, else `"Status <code>"`.
    pub fn message(&self, response: &TransportResponse) -> String {
        self.extractors
            .iter()
            .find_map(|extract| extract(response))
            .unwrap_or_else(|| format!("Status {}", response.status))
    }

    /// A [`ApiError::Remote`] for a non-success response.
    pub fn remote(&self, op: Operation, response: &TransportResponse) -> ApiError {
        let message = self.message(response);
        warn!("{}: HTTP {}: {}", op, response.status, message);
        ApiError::Remote {
            op,
            status: response.status,
            message,
        }
    }
}

/// A [`ApiError::Transport`] for a round trip that produced no response.
pub fn transport(op: Operation, error: TransportError) -> ApiError {
    warn!("{}: {}", op, error);
    ApiError::Transport {
        op,
        message: error.to_string(),
    }
}

/// A [`ApiError::Protocol`] for a success response that breaks the contract.
pub fn protocol(op: Operation, message: impl Into<String>) -> ApiError {
    let message = message.into();
    warn!("{}: {}", op, message);
    ApiError::Protocol { op, message }
}
