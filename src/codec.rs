//! Converts images to and from the base64 text carried in model requests, and
//! packages generated images for download.

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose;

use crate::error::ReimagineError;

/// Errors raised while encoding or decoding image payloads.
#[derive(Debug)]
pub enum CodecError {
    /// The source image had no content to read.
    EmptySource,
    /// The text was not valid base64.
    Decode(base64::DecodeError),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySource => write!(f, "The uploaded image could not be read"),
            Self::Decode(err) => write!(f, "Image data is not valid base64: {err}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encodes binary image content as standard base64.
pub fn encode(image: &[u8]) -> Result<String, CodecError> {
    if image.is_empty() {
        return Err(CodecError::EmptySource);
    }
    Ok(general_purpose::STANDARD.encode(image))
}

/// Decodes standard base64 text back into binary image content.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    general_purpose::STANDARD
        .decode(text.trim())
        .map_err(CodecError::Decode)
}

/// Builds a response that makes the browser save `data` as `filename`.
pub fn package_as_downloadable(
    data: Vec<u8>,
    media_type: &str,
    filename: &str,
) -> Result<Response, ReimagineError> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        sanitize_filename(filename)
    ))
    .map_err(|err| ReimagineError::InternalServerError(err.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, media_type)
        .header(CONTENT_DISPOSITION, disposition)
        .header(CACHE_CONTROL, "no-store")
        .body(Body::from(data))
        .map_err(ReimagineError::from)
}

/// Keeps the characters that are safe inside a quoted header parameter.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        crate::constants::DEFAULT_DOWNLOAD_FILENAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reverses_encode() {
        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, 0xFF];
        let text = encode(&png_header).expect("encode");
        assert_eq!(decode(&text).expect("decode"), png_header);

        let all_bytes: Vec<u8> = (0..=255).collect();
        let text = encode(&all_bytes).expect("encode");
        assert_eq!(decode(&text).expect("decode"), all_bytes);
    }

    #[test]
    fn empty_source_fails_to_encode() {
        assert!(matches!(encode(&[]), Err(CodecError::EmptySource)));
    }

    #[test]
    fn invalid_text_fails_to_decode() {
        assert!(matches!(decode("not base64!"), Err(CodecError::Decode(_))));
    }

    #[test]
    fn downloadable_response_sets_attachment_headers() {
        let response =
            package_as_downloadable(vec![1, 2, 3], "image/png", "generated.png").expect("package");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"generated.png\""
        );
    }

    #[test]
    fn unsafe_filenames_are_cleaned() {
        assert_eq!(sanitize_filename("my \"photo\".png"), "my photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("\"\""), "generated.png");
    }
}
