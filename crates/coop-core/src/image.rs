//! # Image Transport Encoding
//!
//! Image and album-photo columns are stored as raw bytes and always leave
//! the data-access layer as standard (padded) base64 text.
//!
//! ```text
//! BLOB column ──► encode_image() ──► "iVBORw0KGgo..." ──► JSON response
//! ```
//!
//! No size or MIME validation happens here; that belongs to the upload
//! handler.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ValidationError, ValidationResult};

/// Encodes raw image bytes for transport.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a transported image back to raw bytes.
///
/// Used by callers holding an already-encoded buffer that need to write it
/// back through a repository, which always takes raw bytes.
pub fn decode_image(encoded: &str) -> ValidationResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_value() {
        assert_eq!(encode_image(b"coop"), "Y29vcA==");
        assert_eq!(encode_image(&[]), "");
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        assert_eq!(decode_image(" Y29vcA==\n").unwrap(), b"coop".to_vec());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image("not base64!").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
