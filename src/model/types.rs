//! Request and response bodies of the `generateContent` call.

use serde::{Deserialize, Serialize};

/// Role the single content entry is sent under.
pub const USER_ROLE: &str = "user";

/// Response modality asking for image output only.
pub const IMAGE_MODALITY: &str = "IMAGE";

/// Body of a generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRequest {
    /// Ordered conversation content; always a single user entry here.
    pub contents: Vec<Content>,
    /// Output constraints.
    pub generation_config: GenerationConfig,
}

impl ModelRequest {
    /// Text of the first text part, i.e. the effective instruction.
    pub fn instruction(&self) -> Option<&str> {
        self.contents
            .iter()
            .flat_map(|content| content.parts.iter())
            .find_map(|part| match part {
                RequestPart::Text { text } => Some(text.as_str()),
                RequestPart::InlineData { .. } => None,
            })
    }
}

/// One role-tagged entry of the request content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Content {
    /// Author of the entry.
    pub role: String,
    /// Ordered parts.
    pub parts: Vec<RequestPart>,
}

/// A request part: text, or an inline image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// Base64 image embedded in the request.
    InlineData {
        /// The image payload.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Base64 payload plus its media type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type, e.g. `image/png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64 encoded bytes.
    pub data: String,
}

/// Constrains what the model answers with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Accepted output modalities.
    pub response_modalities: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_modalities: vec![IMAGE_MODALITY.to_string()],
        }
    }
}

/// Body of a generation response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Alternative outputs, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Set when the prompt itself was refused.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One alternative output.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when generation stopped early.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Parts of a candidate.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CandidateContent {
    /// Ordered parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A response part. Fields other than text and inline data are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Commentary text.
    #[serde(default)]
    pub text: Option<String>,
    /// An embedded image.
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Prompt-level refusal details.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Machine-readable reason, e.g. `SAFETY`.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Optional explanation.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = ModelRequest {
            contents: vec![Content {
                role: USER_ROLE.to_string(),
                parts: vec![
                    RequestPart::Text {
                        text: "add hair".to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: Some("image/jpeg".to_string()),
                            data: "AAEC".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig::default(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "add hair"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "AAEC"}}
                    ]
                }],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
        assert_eq!(request.instruction(), Some("add hair"));
    }

    #[test]
    fn response_tolerates_unknown_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here you go"},
                        {"thoughtSignature": "abc"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;
        let response: ModelResponse = serde_json::from_str(json).unwrap();
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].text.as_deref(), Some("Here you go"));
        assert!(parts[1].inline_data.is_none());
        assert_eq!(
            parts[2].inline_data.as_ref().unwrap().mime_type.as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn empty_response_deserializes() {
        let response: ModelResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.prompt_feedback.is_none());
    }
}
