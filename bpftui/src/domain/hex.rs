//! Hex rendering of raw map bytes
//!
//! Bytes render as two lowercase hex digits each, separated by single
//! spaces. A zero-length sequence renders as [`EMPTY_MARKER`] so an empty key
//! or value never looks like a missing one. [`parse_hex`] is the exact
//! inverse of [`format_hex`].

use std::fmt::Write;

use thiserror::Error;

/// Rendered form of a zero-length byte sequence
pub const EMPTY_MARKER: &str = "(empty)";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("invalid hex byte {token:?} at position {position}")]
    InvalidByte { token: String, position: usize },
}

/// Render bytes as space-separated hex pairs
#[must_use]
pub fn format_hex(data: &[u8]) -> String {
    if data.is_empty() {
        return EMPTY_MARKER.to_string();
    }

    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parse text produced by [`format_hex`] back into bytes
///
/// # Errors
/// Returns an error if any whitespace-separated token is not exactly two hex digits.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let text = text.trim();
    if text == EMPTY_MARKER {
        return Ok(Vec::new());
    }

    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(HexError::InvalidByte { token: token.to_string(), position });
            }
            u8::from_str_radix(token, 16)
                .map_err(|_| HexError::InvalidByte { token: token.to_string(), position })
        })
        .collect()
}

/// `#[serde(with = ...)]` adapter storing bytes as hex text
pub mod as_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}
