use super::csrf::csrf_token;
use super::prelude::*;
use crate::session::{Phase, SessionState};

#[derive(Template, WebTemplate)]
#[template(path = "editor.html")]
pub(crate) struct EditorTemplate {
    pub(crate) csrf_token: String,
    pub(crate) instruction: String,
    pub(crate) feedback: String,
    pub(crate) has_source: bool,
    pub(crate) has_result: bool,
    pub(crate) has_error: bool,
    pub(crate) error_message: String,
    pub(crate) in_flight: bool,
    pub(crate) phase_label: String,
    pub(crate) phase_class: String,
    pub(crate) model: String,
}

impl EditorTemplate {
    fn from_state(state: &SessionState, csrf_token: String, model: &str) -> Self {
        let (phase_label, phase_class) = match state.phase() {
            Phase::Idle if state.uploaded.is_some() => ("Ready", "idle"),
            Phase::Idle => ("Upload a photo to begin", "idle"),
            Phase::Generating => ("Generating…", "generating"),
            Phase::Succeeded => ("Done", "success"),
            Phase::Failed => ("Failed", "error"),
        };
        Self {
            csrf_token,
            instruction: state.instruction.clone(),
            feedback: state.feedback.clone(),
            has_source: state.uploaded.is_some(),
            has_result: state.generated.is_some(),
            has_error: state.error.is_some(),
            error_message: state
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            in_flight: state.in_flight,
            phase_label: phase_label.to_string(),
            phase_class: phase_class.to_string(),
            model: model.to_string(),
        }
    }
}

/// handles the / GET
pub(crate) async fn root_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<EditorTemplate, ReimagineError> {
    let editor = state.editor_for(&session).await?;
    let snapshot = editor.snapshot();
    let csrf_token = csrf_token(&session).await?;
    debug!("Rendering editor in phase {:?}", snapshot.phase());
    Ok(EditorTemplate::from_state(
        &snapshot,
        csrf_token,
        state.client.model(),
    ))
}
