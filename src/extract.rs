//! Pulls the generated image out of a model response.

use crate::constants::DOWNLOAD_MEDIA_TYPE;
use crate::model::ModelResponse;
use crate::session::GeneratedImage;

/// Returns the first inline image of the first candidate.
///
/// Later candidates are never consulted, even when the first one carries no
/// image.
pub fn extract(response: &ModelResponse) -> Option<GeneratedImage> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;
    content
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .map(|inline_data| GeneratedImage {
            data: inline_data.data.clone(),
            mime_type: inline_data
                .mime_type
                .clone()
                .unwrap_or_else(|| DOWNLOAD_MEDIA_TYPE.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ModelResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn first_image_part_wins() {
        let response = response(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "Sure, here is the edit."},
                {"inlineData": {"mimeType": "image/png", "data": "QUFB"}},
                {"inlineData": {"mimeType": "image/png", "data": "QkJC"}}
            ]}}]}"#,
        );
        let image = extract(&response).unwrap();
        assert_eq!(image.data, "QUFB");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn later_candidates_are_ignored() {
        let response = response(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "I can't do that."}]}},
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "QkJC"}}]}}
            ]}"#,
        );
        assert!(extract(&response).is_none());
    }

    #[test]
    fn no_candidates_means_no_image() {
        assert!(extract(&response(r#"{"candidates": []}"#)).is_none());
        assert!(extract(&response(r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#)).is_none());
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let response = response(r#"{"candidates": [{"content": {"parts": [{"inlineData": {"data": "QUFB"}}]}}]}"#);
        assert_eq!(extract(&response).unwrap().mime_type, "image/png");
    }
}
