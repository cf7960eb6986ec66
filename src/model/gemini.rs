//! Gemini `generateContent` transport.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{ModelClient, ModelError, ModelRequest, ModelResponse};

/// Calls a Gemini image model over HTTP.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: Url,
}

impl GeminiClient {
    /// Creates a client. A missing key is accepted here; calls then fail.
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: Url) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            warn!("No API key configured, image generation will fail until one is set");
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url,
        }
    }

    /// The `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> Result<Url, ModelError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|err| ModelError::new(format!("Invalid model endpoint: {err}")))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ModelError::new(
                "No API key is configured for the image model. Set GEMINI_API_KEY and restart.",
            ));
        };
        let url = self.endpoint()?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &text));
        }

        let parsed: ModelResponse = response.json().await?;
        if let Some(err) = blocked_prompt_error(&parsed) {
            return Err(err);
        }
        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Prefers the API's own error message, falling back to the raw body.
fn error_from_body(status: StatusCode, text: &str) -> ModelError {
    let message = serde_json::from_str::<ErrorEnvelope>(text)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty());
    match message {
        Some(message) => ModelError::new(message),
        None => ModelError::new(format!("Image model returned HTTP {status}: {}", text.trim())),
    }
}

/// A successful response can still report that the prompt was refused.
fn blocked_prompt_error(response: &ModelResponse) -> Option<ModelError> {
    let feedback = response.prompt_feedback.as_ref()?;
    let reason = feedback.block_reason.as_deref()?;
    let message = match feedback
        .block_reason_message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
    {
        Some(message) => format!("{message} ({reason})"),
        None => format!("The request was blocked by the model: {reason}"),
    };
    Some(ModelError::new(message))
}
