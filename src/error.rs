//! Error handling

use axum::response::IntoResponse;
use tracing::info;

use crate::codec::CodecError;
use crate::model::ModelError;

/// Why a generation attempt did not produce an image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GenerationError {
    /// Generate was requested before any image was uploaded.
    MissingImage,
    /// The instruction was empty or only whitespace.
    EmptyInstruction,
    /// The uploaded image could not be encoded for the request.
    Encoding(String),
    /// The model call failed; carries the failure's own message.
    ModelInvocation(String),
    /// The model answered without an inline image.
    NoImageInResponse,
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingImage => write!(f, "Please upload a photo first."),
            Self::EmptyInstruction => write!(f, "Please describe the edit you want."),
            Self::Encoding(message) => write!(f, "{message}"),
            Self::ModelInvocation(message) => write!(f, "{message}"),
            Self::NoImageInResponse => write!(
                f,
                "The model did not return an image. Try rephrasing the instruction."
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<CodecError> for GenerationError {
    fn from(err: CodecError) -> Self {
        GenerationError::Encoding(err.to_string())
    }
}

impl From<ModelError> for GenerationError {
    fn from(err: ModelError) -> Self {
        GenerationError::ModelInvocation(err.to_string())
    }
}

/// definitions for the web application.
#[derive(Debug)]
pub enum ReimagineError {
    /// When you didn't do the right thing
    BadRequest(String),
    /// Missing or invalid session
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<std::io::Error> for ReimagineError {
    fn from(err: std::io::Error) -> Self {
        ReimagineError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for ReimagineError {
    fn from(err: axum::http::Error) -> Self {
        ReimagineError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for ReimagineError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ReimagineError::InternalServerError(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ReimagineError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ReimagineError::BadRequest(err.body_text())
    }
}

impl From<CodecError> for ReimagineError {
    fn from(err: CodecError) -> Self {
        ReimagineError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for ReimagineError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ReimagineError::BadRequest(reason) => {
                info!("Bad request received: {}", reason);
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    format!("Bad Request: {reason}"),
                ));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            ReimagineError::Unauthorized => {
                info!("Unauthorized request received");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Unauthorized: invalid or missing session.",
                ));
                *response.status_mut() = axum::http::StatusCode::UNAUTHORIZED;
                response
            }
            ReimagineError::NotFound(url) => {
                tracing::debug!("404 {url}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Not Found"));
                *response.status_mut() = axum::http::StatusCode::NOT_FOUND;
                response
            }
            ReimagineError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn model_failures_keep_their_message() {
        let err: GenerationError = ModelError::new("quota exceeded for project").into();
        assert_eq!(err.to_string(), "quota exceeded for project");
    }

    #[test]
    fn codec_failures_become_encoding_errors() {
        let err: GenerationError = CodecError::EmptySource.into();
        assert!(matches!(err, GenerationError::Encoding(_)));
    }

    #[test]
    fn web_errors_map_to_status_codes() {
        assert_eq!(
            ReimagineError::BadRequest("nope".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReimagineError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ReimagineError::NotFound("/image/result".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }
}
