//! Exchange-string codec.
//!
//! The in-game exchange format is a version byte (`0`) followed by the
//! base64 encoding of a zlib-compressed JSON document. For convenience
//! this codec also accepts plain JSON input, detected by a leading `{`.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;
use stampwork_schema::{ExportNode, ValidationError, validate};

/// Current exchange-string version byte.
const VERSION_BYTE: char = '0';

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unrecognized input prefix {found:?}: expected an exchange string or a JSON document")]
    UnsupportedFormat { found: Option<char> },
    #[error("exchange string is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("exchange payload failed to inflate: {0}")]
    Compression(#[from] std::io::Error),
    #[error("exchange payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Decode an exchange string or plain JSON document to raw JSON.
///
/// Surrounding whitespace is ignored. Anything that starts with neither
/// the version byte nor `{` is rejected without guessing.
pub fn decode_raw(input: &str) -> Result<Value, CodecError> {
    let text = input.trim();
    match text.chars().next() {
        Some(VERSION_BYTE) => {
            let compressed = BASE64.decode(&text[1..])?;
            let mut json = String::new();
            ZlibDecoder::new(compressed.as_slice()).read_to_string(&mut json)?;
            Ok(serde_json::from_str(&json)?)
        }
        Some('{') => Ok(serde_json::from_str(text)?),
        found => Err(CodecError::UnsupportedFormat { found }),
    }
}

/// Decode and validate into a typed export tree.
pub fn decode(input: &str) -> Result<ExportNode, CodecError> {
    Ok(validate(decode_raw(input)?)?)
}

/// Encode an export tree as an exchange string.
///
/// Uses maximum compression, matching what the game emits.
pub fn encode(node: &ExportNode) -> Result<String, CodecError> {
    let json = serde_json::to_vec(node)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(9));
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(format!("{VERSION_BYTE}{}", BASE64.encode(compressed)))
}

// ===========================================================================
// Tests
// ===========================================================================
