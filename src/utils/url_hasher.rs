//! Content hashing of normalized URLs.
//!
//! A URL is encoded to bytes with a [`TextEncoding`], digested with a
//! [`HashAlgorithm`] and rendered as URL-safe base64 (padding kept). The same
//! URL under the same settings always yields the same string, which is what
//! makes deduplication an exact-match lookup.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Error returned when a configured algorithm or encoding name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashSettingError {
    #[error("Unknown hash algorithm '{0}' (expected MD5 or SHA256)")]
    UnknownAlgorithm(String),

    #[error("Unknown text encoding '{0}' (expected UTF-8, UTF-32, Unicode or ASCII)")]
    UnknownEncoding(String),
}

/// Digest algorithm applied to the encoded URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    pub fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => md5::compute(bytes).0.to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
        }
    }

    /// Length in characters of the padded base64 hash string.
    pub fn encoded_len(self) -> usize {
        let digest_len: usize = match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha256 => 32,
        };
        digest_len.div_ceil(3) * 4
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA256" | "SHA-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(HashSettingError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => f.write_str("MD5"),
            HashAlgorithm::Sha256 => f.write_str("SHA256"),
        }
    }
}

/// Text encoding used to turn the URL into digest input.
///
/// Multi-byte encodings are little-endian and carry no byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    Utf8,
    #[default]
    Utf32,
    /// UTF-16.
    Unicode,
    /// 7-bit ASCII; anything else becomes `?`.
    Ascii,
}

impl TextEncoding {
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf32 => text
                .chars()
                .flat_map(|c| u32::from(c).to_le_bytes())
                .collect(),
            TextEncoding::Unicode => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = HashSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(TextEncoding::Utf8),
            "UTF-32" | "UTF32" => Ok(TextEncoding::Utf32),
            "UNICODE" | "UTF-16" | "UTF16" => Ok(TextEncoding::Unicode),
            "ASCII" | "US-ASCII" => Ok(TextEncoding::Ascii),
            _ => Err(HashSettingError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Utf32 => f.write_str("UTF-32"),
            TextEncoding::Unicode => f.write_str("Unicode"),
            TextEncoding::Ascii => f.write_str("ASCII"),
        }
    }
}

/// Computes the full hash string of an already normalized URL.
pub fn hash_url(url: &str, algorithm: HashAlgorithm, encoding: TextEncoding) -> String {
    let bytes = encoding.encode(url);
    URL_SAFE.encode(algorithm.digest(&bytes))
}
