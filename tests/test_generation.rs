use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reimagine::codec::decode;
use reimagine::config::setup_logging;
use reimagine::error::GenerationError;
use reimagine::model::{ModelClient, ModelError, ModelRequest, ModelResponse};
use reimagine::orchestrator::{Editor, GenerateOutcome};
use reimagine::session::{Action, Phase, UploadedImage};

/// Replays canned responses in order and records every instruction it was sent.
struct ScriptedClient {
    replies: Mutex<Vec<Result<ModelResponse, ModelError>>>,
    instructions: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(mut replies: Vec<Result<ModelResponse, ModelError>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            instructions: Mutex::new(Vec::new()),
        }
    }

    fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        self.instructions
            .lock()
            .unwrap()
            .push(request.instruction().unwrap_or_default().to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ModelError::new("no scripted reply left")))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn image_response(data: &str) -> Result<ModelResponse, ModelError> {
    let json = format!(
        r#"{{"candidates": [{{"content": {{"parts": [{{"inlineData": {{"mimeType": "image/png", "data": "{data}"}}}}]}}}}]}}"#
    );
    Ok(serde_json::from_str(&json).unwrap())
}

fn photo() -> UploadedImage {
    UploadedImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], Some("image/jpeg".to_string()))
}

#[tokio::test]
async fn test_feedback_round_replaces_result() {
    let _ = setup_logging(true);

    let client = Arc::new(ScriptedClient::new(vec![
        image_response("RzE="),
        image_response("RzI="),
    ]));
    let editor = Editor::new(client.clone(), "");
    editor.upload(photo());
    editor.dispatch(Action::SetInstruction("add hair".to_string()));

    assert_eq!(editor.generate(false).await, GenerateOutcome::Succeeded);
    let first = editor.snapshot();
    assert_eq!(decode(&first.generated.unwrap().data).unwrap(), b"G1");
    assert!(first.error.is_none());
    assert!(!first.in_flight);

    editor.dispatch(Action::SetFeedback("higher hairline".to_string()));
    assert_eq!(editor.generate(true).await, GenerateOutcome::Succeeded);
    let second = editor.snapshot();
    assert_eq!(decode(&second.generated.unwrap().data).unwrap(), b"G2");

    let instructions = client.instructions();
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0], "add hair");
    assert!(instructions[1].starts_with("add hair"));
    assert!(instructions[1].contains("higher hairline"));
}

#[tokio::test]
async fn test_errors_are_per_attempt() {
    let client = Arc::new(ScriptedClient::new(vec![
        Err(ModelError::new("Quota exceeded")),
        image_response("RzE="),
    ]));
    let editor = Editor::new(client.clone(), "add hair");

    assert_eq!(
        editor.generate(false).await,
        GenerateOutcome::Rejected(GenerationError::MissingImage)
    );
    assert!(client.instructions().is_empty());

    editor.upload(photo());
    assert!(editor.snapshot().error.is_none());

    assert_eq!(
        editor.generate(false).await,
        GenerateOutcome::Failed(GenerationError::ModelInvocation("Quota exceeded".to_string()))
    );
    assert_eq!(editor.snapshot().phase(), Phase::Failed);

    assert_eq!(editor.generate(false).await, GenerateOutcome::Succeeded);
    let state = editor.snapshot();
    assert_eq!(state.phase(), Phase::Succeeded);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_reset_restores_default_instruction() {
    let client = Arc::new(ScriptedClient::new(vec![image_response("RzE=")]));
    let editor = Editor::new(client, "add hair");
    editor.upload(photo());
    editor.dispatch(Action::SetInstruction("make it grey".to_string()));
    editor.dispatch(Action::SetFeedback("less grey".to_string()));
    assert_eq!(editor.generate(false).await, GenerateOutcome::Succeeded);

    editor.reset();
    let state = editor.snapshot();
    assert!(state.uploaded.is_none());
    assert!(state.generated.is_none());
    assert!(state.feedback.is_empty());
    assert!(state.error.is_none());
    assert_eq!(state.instruction, "add hair");
    assert_eq!(state.phase(), Phase::Idle);
}
