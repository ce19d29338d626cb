//! Property values and their text encodings.
//!
//! An entry is written as `name=type|value`:
//!
//! | type | value                                                         |
//! |------|---------------------------------------------------------------|
//! | `1`  | `u32` in decimal                                              |
//! | `2`  | base64 of an 8-byte little-endian bit count, then the payload |
//!
//! The untyped form `name|value` carries the remaining bytes of the line
//! verbatim and is kept as [`PropertyValue::Raw`]. It cannot carry a newline
//! byte, and a trailing carriage return is read as part of the line ending.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{PropertyError, Result};

/// Type tag of a `u32` value.
pub const UINT32_TAG: &str = "1";

/// Type tag of a byte array value.
pub const BYTE_ARRAY_TAG: &str = "2";

/// Size of the bit-count prefix of a byte array.
const SIZE_PREFIX_LEN: usize = 8;

/// Width of one packed integer element.
const U32_WIDTH: usize = 4;

/// A decoded property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Type 1: a 32-bit unsigned integer.
    UInt32(u32),
    /// Type 2: an opaque byte array.
    ByteArray(Vec<u8>),
    /// Untyped: the bytes following `|` as written.
    Raw(Vec<u8>),
}

impl PropertyValue {
    /// Decode a value from its type tag (`None` for the untyped form) and
    /// the text after `|`.
    pub fn decode(name: &str, tag: Option<&str>, text: &[u8]) -> Result<Self> {
        match tag {
            None => Ok(Self::Raw(text.to_vec())),
            Some(UINT32_TAG) => parse_decimal(name, trim_ascii(text)).map(Self::UInt32),
            Some(BYTE_ARRAY_TAG) => decode_byte_array(name, trim_ascii(text)).map(Self::ByteArray),
            Some(other) => Err(PropertyError::UnknownType {
                name: name.to_string(),
                tag: other.to_string(),
            }),
        }
    }

    /// Append `name=type|value` (or `name|value` for raw values) to `out`,
    /// without a line terminator.
    pub fn encode_entry(&self, name: &str, out: &mut Vec<u8>) {
        out.extend_from_slice(name.as_bytes());
        match self {
            Self::UInt32(v) => {
                out.extend_from_slice(format!("={UINT32_TAG}|{v}").as_bytes());
            }
            Self::ByteArray(bytes) => {
                let mut framed = Vec::with_capacity(SIZE_PREFIX_LEN + bytes.len());
                framed.extend_from_slice(&((bytes.len() as u64) * 8).to_le_bytes());
                framed.extend_from_slice(bytes);
                out.extend_from_slice(format!("={BYTE_ARRAY_TAG}|").as_bytes());
                out.extend_from_slice(STANDARD.encode(framed).as_bytes());
            }
            Self::Raw(bytes) => {
                out.push(b'|');
                out.extend_from_slice(bytes);
            }
        }
    }
}

/// Decode a packed array of little-endian `u32` values.
///
/// The element count is implied by the length, which must be a multiple of
/// four.
pub fn decode_u32_array(name: &str, bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % U32_WIDTH != 0 {
        return Err(PropertyError::Misaligned {
            name: name.to_string(),
            len: bytes.len(),
            width: U32_WIDTH,
        });
    }
    Ok(bytes
        .chunks_exact(U32_WIDTH)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Pack `u32` values as little-endian bytes.
pub fn encode_u32_array(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Parse a decimal `u32`, tolerating surrounding whitespace.
pub(crate) fn parse_decimal(name: &str, text: &[u8]) -> Result<u32> {
    let invalid = || PropertyError::InvalidInteger {
        name: name.to_string(),
        value: String::from_utf8_lossy(text).into_owned(),
    };
    std::str::from_utf8(text)
        .map_err(|_| invalid())?
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid())
}

fn decode_byte_array(name: &str, text: &[u8]) -> Result<Vec<u8>> {
    let framed = STANDARD
        .decode(text)
        .map_err(|source| PropertyError::Base64 {
            name: name.to_string(),
            source,
        })?;
    let Some((prefix, payload)) = framed.split_first_chunk::<SIZE_PREFIX_LEN>() else {
        return Err(PropertyError::TruncatedByteArray {
            name: name.to_string(),
            len: framed.len(),
        });
    };
    let bits = u64::from_le_bytes(*prefix);
    if bits % 8 != 0 || bits / 8 != payload.len() as u64 {
        return Err(PropertyError::SizeMismatch {
            name: name.to_string(),
            bits,
            available: payload.len(),
        });
    }
    Ok(payload.to_vec())
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &bytes[start..end]
}
