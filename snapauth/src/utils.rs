use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}

/// Encodes bytes as canonical base64url: URL-safe alphabet, no padding.
///
/// The empty byte sequence encodes to the empty string.
pub(crate) fn base64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes a base64url string into raw bytes.
///
/// Strict: any character outside `[A-Za-z0-9_-]` (including padding and
/// whitespace) is rejected. There is no lenient mode.
pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| UtilError::Format(format!("Failed to decode base64url: {e}")))
}
