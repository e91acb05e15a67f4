//! Encoding-resilient loader for structured (JSON) knowledge documents.
//!
//! Catalog and API specification files arrive from many editors and export
//! tools, so the loader does not trust any single encoding. It tries a fixed
//! sequence of strict decodings, then falls back to a lossy BOM-sniffed decode
//! before giving up with [`DocdeskError::DecodeFailure`].

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use docdesk_shared::{DocdeskError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

/// Text encodings attempted by the loader, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with an optional leading signature.
    Utf8Sig,
    /// UTF-16 whose byte order is taken from the BOM (little-endian without one).
    Utf16,
    Utf16Le,
    Utf16Be,
    Utf8,
}

/// Order in which strict decodings are attempted.
pub const ATTEMPT_ORDER: [TextEncoding; 5] = [
    TextEncoding::Utf8Sig,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
    TextEncoding::Utf8,
];

impl TextEncoding {
    /// Label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8Sig => "utf-8-sig",
            Self::Utf16 => "utf-16",
            Self::Utf16Le => "utf-16-le",
            Self::Utf16Be => "utf-16-be",
            Self::Utf8 => "utf-8",
        }
    }

    /// Strictly decode `bytes`; `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let decoded = match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            Self::Utf16 => {
                if let Some(body) = bytes.strip_prefix(UTF16_BE_BOM) {
                    UTF_16BE.decode_without_bom_handling_and_without_replacement(body)
                } else {
                    let body = bytes.strip_prefix(UTF16_LE_BOM).unwrap_or(bytes);
                    UTF_16LE.decode_without_bom_handling_and_without_replacement(body)
                }
            }
            Self::Utf16Le => UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Utf16Be => UTF_16BE.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
        };
        decoded.map(Cow::into_owned)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and parse the structured document at `path`.
///
/// Fails with [`DocdeskError::NotFound`] when the file does not exist and
/// [`DocdeskError::DecodeFailure`] when no decoding yields valid JSON.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_document(path: &Path) -> Result<Value> {
    let bytes = read_bytes(path)?;
    decode_document(&bytes).map_err(|message| {
        warn!(error = %message, "document could not be decoded");
        DocdeskError::decode(path, message)
    })
}

/// Read a plain-text file (such as a markdown rule file) without requiring
/// valid UTF-8. UTF-16 is recognized by its BOM; a leading BOM is dropped.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    let text = decode_lossy(&bytes);
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocdeskError::not_found(path)
        } else {
            DocdeskError::io(path, e)
        }
    })
}

/// Decode and parse raw document bytes.
///
/// Returns the parse error of the final lossy attempt when every decoding fails.
pub fn decode_document(bytes: &[u8]) -> std::result::Result<Value, String> {
    for encoding in ATTEMPT_ORDER {
        let Some(text) = encoding.decode(bytes) else {
            debug!(encoding = encoding.label(), "decode failed");
            continue;
        };
        match parse_text(&text) {
            Ok(value) => {
                debug!(encoding = encoding.label(), "document parsed");
                return Ok(value);
            }
            Err(e) => debug!(encoding = encoding.label(), error = %e, "parse failed"),
        }
    }

    let text = decode_lossy(bytes);
    parse_text(&text).map_err(|e| format!("no supported encoding produced valid JSON: {e}"))
}

/// Binary fallback: sniff a UTF-16 BOM, otherwise UTF-8 with replacement.
fn decode_lossy(bytes: &[u8]) -> String {
    let (text, had_errors) = if let Some(body) = bytes.strip_prefix(UTF16_LE_BOM) {
        UTF_16LE.decode_without_bom_handling(body)
    } else if let Some(body) = bytes.strip_prefix(UTF16_BE_BOM) {
        UTF_16BE.decode_without_bom_handling(body)
    } else {
        UTF_8.decode_without_bom_handling(bytes)
    };
    if had_errors {
        debug!("lossy decode replaced invalid sequences");
    }
    text.into_owned()
}

fn parse_text(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text.strip_prefix('\u{feff}').unwrap_or(text))
}
