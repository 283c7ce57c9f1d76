//! Converted files: base64 payload assembly and the [`BinaryArtifact`] type.
//!
//! ## Why windowed assembly?
//!
//! The conversion endpoint embeds the whole output file as one base64 string.
//! Rather than decoding into a single buffer sized for the full payload up
//! front, [`assemble_file_data`] streams the decoder and cuts its output into
//! fixed windows (512 bytes by default). Each window becomes one block in an
//! ordered list and the blocks are concatenated positionally at the end. The
//! window size is a tuning knob, not part of the wire contract: any size ≥ 1
//! yields the same bytes.

use crate::format::OutputFormat;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::read::DecoderReader;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 payload into bytes, `window` decoded bytes at a time.
///
/// ASCII whitespace anywhere in the payload is ignored (line-wrapped output
/// decodes as-is) and `=` padding may be omitted. Malformed input is
/// reported as `io::ErrorKind::InvalidData` carrying the decoder's message.
pub fn assemble_file_data(encoded: &str, window: usize) -> io::Result<Vec<u8>> {
    let window = window.max(1);
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let mut decoder = DecoderReader::new(compact.as_slice(), &LENIENT);
    let mut blocks: Vec<Vec<u8>> = Vec::new();

    loop {
        let mut block = Vec::with_capacity(window);
        let filled = (&mut decoder).take(window as u64).read_to_end(&mut block)?;
        if filled == 0 {
            break;
        }
        blocks.push(block);
        if filled < window {
            break;
        }
    }

    debug!(
        "Assembled {} block(s) of ≤{} bytes from {} base64 chars",
        blocks.len(),
        window,
        encoded.len()
    );
    Ok(blocks.concat())
}

/// A converted file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    pub bytes: Vec<u8>,
    /// Media type declared by the service.
    pub mime_type: String,
}

impl BinaryArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact to `path` atomically (temp file in the same
    /// directory, then rename), creating parent directories as needed.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await?;

        let bytes = self.bytes.clone();
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            use std::io::Write;
            let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
            tmp.write_all(&bytes)?;
            tmp.flush()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        debug!("Saved {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Reduce a user-supplied name to a safe file stem.
///
/// Everything after the first `.` is dropped (so `"report.final.pdf"` becomes
/// `"report"`), runs of unsafe characters become `_`, and a name with nothing
/// left falls back to `default`.
pub fn sanitize_stem(name: &str, default: &str) -> String {
    let base = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
        .split('.')
        .next()
        .unwrap_or("");
    let cleaned = UNSAFE_CHARS.replace_all(base.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned.to_string()
    }
}

/// `"<stem>.<ext>"` for a converted artifact.
pub fn suggested_file_name(stem: &str, format: &OutputFormat) -> String {
    format!("{}.{}", sanitize_stem(stem, crate::config::DEFAULT_FILENAME), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
    use base64::Engine as _;

    /// xorshift64; deterministic so failures reproduce.
    fn next(state: &mut u64) -> u64 {
        *state ^= *state << 13;
        *state ^= *state >> 7;
        *state ^= *state << 17;
        *state
    }

    #[test]
    fn round_trip_any_window() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1500).collect();
        let encoded = STANDARD.encode(&data);
        for window in [1, 2, 3, 4, 7, 100, 511, 512, 513, 1500, 4096] {
            let decoded = assemble_file_data(&encoded, window).unwrap();
            assert_eq!(decoded, data, "window {window}");
        }
    }

    #[test]
    fn round_trip_short_lengths() {
        for len in 1..40usize {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
            let encoded = STANDARD.encode(&data);
            assert_eq!(assemble_file_data(&encoded, 512).unwrap(), data, "len {len}");
            assert_eq!(assemble_file_data(&encoded, 5).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn round_trip_random_lengths_and_windows() {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        for _ in 0..300 {
            let len = 1 + (next(&mut state) % 3000) as usize;
            let window = 1 + (next(&mut state) % 1100) as usize;
            let data: Vec<u8> = (0..len).map(|_| next(&mut state) as u8).collect();
            let encoded = STANDARD.encode(&data);
            assert_eq!(
                assemble_file_data(&encoded, window).unwrap(),
                data,
                "len {len}, window {window}"
            );
        }
    }

    #[test]
    fn line_wrapped_payload_decodes() {
        assert_eq!(
            assemble_file_data("aGVsbG8g\ndGV4dA==\n", 512).unwrap(),
            b"hello text"
        );
        let data: Vec<u8> = (0..200u8).collect();
        let wrapped = STANDARD
            .encode(&data)
            .as_bytes()
            .chunks(76)
            .map(|line| format!("{}\r\n", String::from_utf8_lossy(line)))
            .collect::<String>();
        assert_eq!(assemble_file_data(&wrapped, 3).unwrap(), data);
    }

    #[test]
    fn unpadded_payload_decodes() {
        assert_eq!(assemble_file_data("aGVsbG8gdGV4dA", 512).unwrap(), b"hello text");
        for len in 1..10usize {
            let data = vec![0x5Au8; len];
            let encoded = STANDARD_NO_PAD.encode(&data);
            assert_eq!(assemble_file_data(&encoded, 2).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn exact_window_multiple() {
        let data = vec![0xABu8; 1024];
        let encoded = STANDARD.encode(&data);
        assert_eq!(assemble_file_data(&encoded, 512).unwrap(), data);
    }

    #[test]
    fn empty_payload_decodes_to_nothing() {
        assert!(assemble_file_data("", 512).unwrap().is_empty());
        assert!(assemble_file_data("  \n", 512).unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_invalid_data() {
        let err = assemble_file_data("not*base64!", 512).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn sanitize_examples() {
        assert_eq!(sanitize_stem("scan.final.pdf", "output"), "scan");
        assert_eq!(sanitize_stem("/tmp/my notes.png", "output"), "my_notes");
        assert_eq!(sanitize_stem("   ", "output"), "output");
        assert_eq!(sanitize_stem(".hidden", "output"), "output");
        assert_eq!(sanitize_stem("rapport-été", "output"), "rapport-_t");
    }

    #[test]
    fn suggested_names() {
        assert_eq!(suggested_file_name("notes", &OutputFormat::Txt), "notes.txt");
        assert_eq!(suggested_file_name("scan.jpg", &OutputFormat::Image), "scan.png");
        assert_eq!(suggested_file_name("", &OutputFormat::Pdf), "output.pdf");
    }

    #[tokio::test]
    async fn save_to_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let artifact = BinaryArtifact {
            bytes: b"hello".to_vec(),
            mime_type: "text/plain".into(),
        };
        artifact.save_to(&path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
