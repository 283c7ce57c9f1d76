//! Target formats accepted by the conversion endpoint.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Output format for a conversion request.
///
/// The four known formats are the ones the service advertises. Anything
/// else parses into [`OutputFormat::Other`] and is sent as-is: the client
/// does not decide which formats the service supports, the service does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Plain UTF-8 text. (default)
    #[default]
    Txt,
    Pdf,
    /// Word-processor document.
    Doc,
    /// Rendered PNG image of the text.
    Image,
    /// A format this client does not know about, lower-cased.
    Other(String),
}

impl OutputFormat {
    /// The value sent in the `format` field of the request body.
    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Doc => "doc",
            OutputFormat::Image => "image",
            OutputFormat::Other(s) => s,
        }
    }

    /// Conventional media type, used when the response omits `mimeType`.
    pub fn default_mime_type(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Txt => Some("text/plain"),
            OutputFormat::Pdf => Some("application/pdf"),
            OutputFormat::Doc => Some("application/msword"),
            OutputFormat::Image => Some("image/png"),
            OutputFormat::Other(_) => None,
        }
    }

    /// File extension for a saved artifact.
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Image => "png",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Ok(match s.as_str() {
            "txt" | "text" => OutputFormat::Txt,
            "pdf" => OutputFormat::Pdf,
            "doc" => OutputFormat::Doc,
            "image" | "png" => OutputFormat::Image,
            _ => OutputFormat::Other(s),
        })
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(f) => f,
            Err(never) => match never {},
        }
    }
}

impl Serialize for OutputFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OutputFormat::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_case_insensitive() {
        assert_eq!(OutputFormat::from("PDF"), OutputFormat::Pdf);
        assert_eq!(OutputFormat::from(" txt "), OutputFormat::Txt);
        assert_eq!(OutputFormat::from("Image"), OutputFormat::Image);
        assert_eq!(OutputFormat::from("doc"), OutputFormat::Doc);
    }

    #[test]
    fn unknown_format_is_kept() {
        let f = OutputFormat::from("DOCX");
        assert_eq!(f, OutputFormat::Other("docx".into()));
        assert_eq!(f.as_str(), "docx");
        assert_eq!(f.default_mime_type(), None);
    }

    #[test]
    fn serializes_as_wire_string() {
        let json = serde_json::to_string(&OutputFormat::Image).unwrap();
        assert_eq!(json, "\"image\"");
        let back: OutputFormat = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(back, OutputFormat::Pdf);
    }

    #[test]
    fn image_saves_as_png() {
        assert_eq!(OutputFormat::Image.extension(), "png");
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
    }
}
