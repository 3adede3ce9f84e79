use base64::prelude::*;

use crate::core::error::{AppError, Result};

/// Content types accepted for category images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client, if any
    pub file_name: Option<String>,
    /// Declared MIME type, lowercased and stripped of parameters
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: normalize_content_type(content_type),
            data,
        }
    }
}

/// Check if a declared content type may be stored as a category image
pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Base64-encode an uploaded image.
///
/// Only the declared content type is checked; the bytes are stored as sent.
pub fn encode(file: &UploadedFile) -> Result<String> {
    if !is_image_type_allowed(&file.content_type) {
        return Err(AppError::Validation(format!(
            "File must be a JPEG or PNG image, got '{}'",
            file.content_type
        )));
    }

    Ok(BASE64_STANDARD.encode(&file.data))
}

/// Decode stored base64 text back into raw image bytes
#[allow(dead_code)]
pub fn decode(text: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(text)
        .map_err(|e| AppError::Validation(format!("Error decoding Base64 image: {}", e)))
}

fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use tokio_test::{assert_err, assert_ok};

    fn png(data: &[u8]) -> UploadedFile {
        UploadedFile::new(Some("valid.png".to_string()), "image/png", data.to_vec())
    }

    #[test]
    fn test_encode_accepts_jpeg_and_png() {
        let jpeg = UploadedFile::new(None, "image/jpeg", vec![0xff, 0xd8, 0xff]);
        assert_eq!(assert_ok!(encode(&jpeg)), "/9j/");
        assert_eq!(assert_ok!(encode(&png(b"hello"))), "aGVsbG8=");
    }

    #[test]
    fn test_encode_rejects_other_types() {
        for content_type in ["image/gif", "image/webp", "application/pdf", "text/plain", ""] {
            let file = UploadedFile::new(None, content_type, b"data".to_vec());
            let err = assert_err!(encode(&file));
            assert!(matches!(err, AppError::Validation(_)), "{}", content_type);
        }
    }

    #[test]
    fn test_content_type_is_normalized() {
        let file = UploadedFile::new(None, "Image/PNG; charset=binary", b"x".to_vec());
        assert_eq!(file.content_type, "image/png");
        assert_ok!(encode(&file));
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let err = assert_err!(decode("not base64!!"));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_round_trip_arbitrary_bytes() {
        for _ in 0..64 {
            let bytes: Vec<u8> = Faker.fake();
            let encoded = assert_ok!(encode(&png(&bytes)));
            assert_eq!(assert_ok!(decode(&encoded)), bytes);
            assert_eq!(assert_ok!(encode(&png(&assert_ok!(decode(&encoded))))), encoded);
        }
    }
}
