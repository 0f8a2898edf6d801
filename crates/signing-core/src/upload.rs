//! Uploaded signature validation
//!
//! An upload is accepted only when its MIME type is on the allowlist and the
//! payload carries the matching magic bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

/// MIME types accepted for uploaded signature images
pub const ALLOWED_UPLOAD_TYPES: &[&str] = &["image/jpeg", "image/png", "image/svg+xml"];

/// PNG magic bytes: 89 50 4E 47 0D 0A 1A 0A
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG SOI marker plus the 0xFF that opens the first segment
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Please upload a JPG, PNG, or SVG image.")]
    UnsupportedType(String),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Uploaded file is not a valid {0} image")]
    CorruptImage(&'static str),
}

/// Validate an uploaded signature image.
pub fn validate_upload(mime: &str, data: &[u8]) -> Result<(), UploadError> {
    if !ALLOWED_UPLOAD_TYPES.contains(&mime) {
        return Err(UploadError::UnsupportedType(mime.to_string()));
    }
    if data.is_empty() {
        return Err(UploadError::EmptyFile);
    }

    match mime {
        "image/png" => {
            if data.len() < PNG_MAGIC.len() || !data.starts_with(&PNG_MAGIC) {
                return Err(UploadError::CorruptImage("PNG"));
            }
        }
        "image/jpeg" => {
            if data.len() < JPEG_MAGIC.len() || !data.starts_with(&JPEG_MAGIC) {
                return Err(UploadError::CorruptImage("JPEG"));
            }
        }
        "image/svg+xml" => {
            let text = std::str::from_utf8(data).map_err(|_| UploadError::CorruptImage("SVG"))?;
            let trimmed = text.trim_start();
            if !trimmed.starts_with("<?xml") && !trimmed.starts_with("<svg") {
                return Err(UploadError::CorruptImage("SVG"));
            }
        }
        _ => unreachable!("allowlist covers every arm"),
    }

    Ok(())
}

/// Encode image bytes as a base64 `data:` URL.
pub fn encode_data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn valid_png() -> Vec<u8> {
        let mut data = PNG_MAGIC.to_vec();
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52]);
        data
    }

    #[test]
    fn test_accepts_valid_png() {
        assert!(validate_upload("image/png", &valid_png()).is_ok());
    }

    #[test]
    fn test_accepts_valid_jpeg() {
        assert!(validate_upload("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).is_ok());
    }

    #[test]
    fn test_accepts_valid_svg() {
        assert!(validate_upload("image/svg+xml", b"<svg></svg>").is_ok());
        assert!(validate_upload("image/svg+xml", b"<?xml version=\"1.0\"?><svg/>").is_ok());
    }

    #[test]
    fn test_rejects_disallowed_mime_types() {
        for mime in ["image/gif", "image/webp", "application/pdf", "text/html"] {
            assert_eq!(
                validate_upload(mime, &valid_png()),
                Err(UploadError::UnsupportedType(mime.to_string()))
            );
        }
    }

    #[test]
    fn test_rejects_empty_file() {
        assert_eq!(validate_upload("image/png", &[]), Err(UploadError::EmptyFile));
    }

    #[test]
    fn test_rejects_png_without_magic() {
        assert_eq!(
            validate_upload("image/png", b"not a png at all"),
            Err(UploadError::CorruptImage("PNG"))
        );
    }

    #[test]
    fn test_rejects_svg_without_root() {
        assert_eq!(
            validate_upload("image/svg+xml", b"plain text"),
            Err(UploadError::CorruptImage("SVG"))
        );
    }

    #[test]
    fn test_data_url_format() {
        let url = encode_data_url("image/png", &[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
    }

    proptest! {
        /// MIME types outside the allowlist are always rejected
        #[test]
        fn prop_unknown_mime_rejected(mime in "[a-z]{3,10}/[a-z0-9.+-]{3,12}") {
            prop_assume!(!ALLOWED_UPLOAD_TYPES.contains(&mime.as_str()));
            let result = validate_upload(&mime, &[0xFF, 0xD8, 0xFF]);
            prop_assert_eq!(result, Err(UploadError::UnsupportedType(mime)));
        }

        /// Garbage without the PNG magic never validates as PNG
        #[test]
        fn prop_png_magic_enforced(garbage in proptest::collection::vec(any::<u8>(), 8..64)) {
            prop_assume!(!garbage.starts_with(&PNG_MAGIC));
            prop_assert!(validate_upload("image/png", &garbage).is_err());
        }

        /// Data URLs always carry the MIME type and base64 marker
        #[test]
        fn prop_data_url_shape(data in proptest::collection::vec(any::<u8>(), 0..128)) {
            let url = encode_data_url("image/svg+xml", &data);
            prop_assert!(url.starts_with("data:image/svg+xml;base64,"));
        }
    }
}
