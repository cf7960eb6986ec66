//! Composes model requests from an instruction and the encoded photo.

use crate::constants::{DEFAULT_MEDIA_TYPE, FEEDBACK_LABEL};
use crate::model::types::{
    Content, GenerationConfig, InlineData, ModelRequest, RequestPart, USER_ROLE,
};

/// What the user asked for, plus optional feedback on the previous result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationInstruction {
    /// The base instruction.
    pub base: String,
    /// Feedback amendment, only used on regeneration.
    pub feedback: Option<String>,
}

impl GenerationInstruction {
    /// An instruction without feedback.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            feedback: None,
        }
    }

    /// Attaches a feedback amendment.
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// The text actually sent to the model.
    ///
    /// Feedback is appended on its own labelled line only for a regeneration
    /// with non-blank feedback; otherwise the base instruction goes out as is.
    pub fn effective(&self, is_regeneration: bool) -> String {
        match self.feedback.as_deref() {
            Some(feedback) if is_regeneration && !feedback.trim().is_empty() => {
                format!("{}\n\n{} {}", self.base, FEEDBACK_LABEL, feedback)
            }
            _ => self.base.clone(),
        }
    }
}

/// Builds the request: one text part then one inline image part.
pub fn build(
    instruction: &GenerationInstruction,
    is_regeneration: bool,
    encoded_image: String,
    media_type: Option<&str>,
) -> ModelRequest {
    let mime_type = media_type
        .map(str::trim)
        .filter(|media_type| !media_type.is_empty())
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_string();

    ModelRequest {
        contents: vec![Content {
            role: USER_ROLE.to_string(),
            parts: vec![
                RequestPart::Text {
                    text: instruction.effective(is_regeneration),
                },
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: Some(mime_type),
                        data: encoded_image,
                    },
                },
            ],
        }],
        generation_config: GenerationConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_generation_ignores_feedback() {
        let instruction = GenerationInstruction::new("add hair").with_feedback("higher hairline");
        assert_eq!(instruction.effective(false), "add hair");
    }

    #[test]
    fn regeneration_appends_labelled_feedback() {
        let instruction = GenerationInstruction::new("add hair").with_feedback("higher hairline");
        assert_eq!(
            instruction.effective(true),
            "add hair\n\nFeedback on the previous result: higher hairline"
        );
    }

    #[test]
    fn blank_feedback_leaves_instruction_alone() {
        for feedback in ["", "   ", "\n\t"] {
            let instruction = GenerationInstruction::new("add hair").with_feedback(feedback);
            assert_eq!(instruction.effective(true), "add hair");
        }
        assert_eq!(GenerationInstruction::new("add hair").effective(true), "add hair");
    }

    #[test]
    fn feedback_is_kept_verbatim() {
        let instruction =
            GenerationInstruction::new("add hair").with_feedback("  darker, and  curlier ");
        assert!(instruction.effective(true).ends_with("  darker, and  curlier "));
    }

    #[test]
    fn request_has_text_then_image() {
        let request = build(
            &GenerationInstruction::new("add hair"),
            false,
            "AAEC".to_string(),
            Some("image/jpeg"),
        );
        assert_eq!(request.contents.len(), 1);
        let content = &request.contents[0];
        assert_eq!(content.role, "user");
        assert_eq!(content.parts.len(), 2);
        assert_eq!(
            content.parts[0],
            RequestPart::Text {
                text: "add hair".to_string()
            }
        );
        assert_eq!(
            content.parts[1],
            RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: Some("image/jpeg".to_string()),
                    data: "AAEC".to_string(),
                }
            }
        );
        assert_eq!(request.generation_config.response_modalities, vec!["IMAGE"]);
    }

    #[test]
    fn missing_media_type_defaults() {
        for media_type in [None, Some(""), Some("  ")] {
            let request = build(
                &GenerationInstruction::new("add hair"),
                false,
                "AAEC".to_string(),
                media_type,
            );
            let RequestPart::InlineData { inline_data } = &request.contents[0].parts[1] else {
                panic!("second part should be inline data");
            };
            assert_eq!(inline_data.mime_type.as_deref(), Some(DEFAULT_MEDIA_TYPE));
        }
    }
}
