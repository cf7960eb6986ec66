use axum::body::Bytes;
use axum::extract::Multipart;

use super::csrf::validate_csrf;
use super::prelude::*;
use crate::orchestrator::GenerateOutcome;
use crate::session::UploadedImage;

#[derive(Deserialize)]
pub(crate) struct CsrfForm {
    csrf_token: String,
}

#[derive(Deserialize)]
pub(crate) struct GenerateForm {
    csrf_token: String,
    instruction: String,
}

#[derive(Deserialize)]
pub(crate) struct RegenerateForm {
    csrf_token: String,
    instruction: Option<String>,
    #[serde(default)]
    feedback: String,
}

/// Picks the media type for an upload, or `None` when it is not an image.
///
/// A declared `image/*` type is trusted; otherwise the content is sniffed.
pub(crate) fn resolve_media_type(declared: Option<&str>, data: &[u8]) -> Option<String> {
    if let Some(declared) = declared.map(str::trim)
        && declared.to_ascii_lowercase().starts_with("image/")
    {
        return Some(declared.to_ascii_lowercase());
    }
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

pub(crate) async fn upload_handler(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect, ReimagineError> {
    let mut token = String::new();
    let mut upload: Option<(Bytes, Option<String>)> = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("csrf_token") => token = field.text().await?,
            Some("image") => {
                let declared = field.content_type().map(str::to_owned);
                let data = field.bytes().await?;
                upload = Some((data, declared));
            }
            _ => {}
        }
    }
    validate_csrf(&session, &token).await?;

    let Some((data, declared)) = upload.filter(|(data, _)| !data.is_empty()) else {
        return Err(ReimagineError::BadRequest("no photo was selected".to_string()));
    };
    let Some(media_type) = resolve_media_type(declared.as_deref(), &data) else {
        return Err(ReimagineError::BadRequest(
            "the selected file is not an image".to_string(),
        ));
    };

    info!("Received upload of {} bytes ({})", data.len(), media_type);
    let editor = state.editor_for(&session).await?;
    editor.upload(UploadedImage::new(data, Some(media_type)));
    Ok(Redirect::to("/"))
}

pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, ReimagineError> {
    validate_csrf(&session, &form.csrf_token).await?;
    let editor = state.editor_for(&session).await?;
    editor.dispatch(Action::SetInstruction(form.instruction));
    log_outcome(&editor.generate(false).await);
    Ok(Redirect::to("/"))
}

pub(crate) async fn regenerate_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegenerateForm>,
) -> Result<Redirect, ReimagineError> {
    validate_csrf(&session, &form.csrf_token).await?;
    let editor = state.editor_for(&session).await?;
    if let Some(instruction) = form.instruction {
        editor.dispatch(Action::SetInstruction(instruction));
    }
    editor.dispatch(Action::SetFeedback(form.feedback));
    log_outcome(&editor.generate(true).await);
    Ok(Redirect::to("/"))
}

pub(crate) async fn reset_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect, ReimagineError> {
    validate_csrf(&session, &form.csrf_token).await?;
    state.editor_for(&session).await?.reset();
    Ok(Redirect::to("/"))
}

fn log_outcome(outcome: &GenerateOutcome) {
    match outcome {
        GenerateOutcome::AlreadyInFlight => debug!("Generate ignored, one is already running"),
        GenerateOutcome::Rejected(err) | GenerateOutcome::Failed(err) => {
            debug!("Generate finished with error: {}", err)
        }
        GenerateOutcome::Succeeded => debug!("Generate finished"),
    }
}
