//! The image model boundary: wire types, the client trait and the Gemini
//! transport.

use async_trait::async_trait;

pub mod gemini;
pub mod types;

pub use types::{ModelRequest, ModelResponse};

/// A failed model invocation, with a message fit to show the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelError {
    message: String,
}

impl ModelError {
    /// Wraps a human-readable failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ModelError {}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::new(format!("Request to the image model failed: {err}"))
    }
}

/// Anything that can answer a [`ModelRequest`].
///
/// The orchestrator only sees this trait, so the HTTP transport can be swapped
/// for a test double.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends the request and waits for the model to settle.
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;

    /// Identifier of the model requests are sent to.
    fn model(&self) -> &str;
}
