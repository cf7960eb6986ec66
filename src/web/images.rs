use axum::body::Body;
use axum::extract::Query;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;

use super::prelude::*;
use crate::codec::{decode, package_as_downloadable};
use crate::constants::{DEFAULT_DOWNLOAD_FILENAME, DEFAULT_MEDIA_TYPE, DOWNLOAD_MEDIA_TYPE};

#[derive(Deserialize)]
pub(crate) struct DownloadQuery {
    filename: Option<String>,
}

/// Session images change on every upload or generation, so nothing is cached.
fn inline_image(data: impl Into<Body>, media_type: &str) -> Result<Response, ReimagineError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, media_type)
        .header(CACHE_CONTROL, "no-store")
        .body(data.into())
        .map_err(ReimagineError::from)
}

pub(crate) async fn source_image_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ReimagineError> {
    let snapshot = state.editor_for(&session).await?.snapshot();
    let Some(uploaded) = snapshot.uploaded else {
        return Err(ReimagineError::NotFound("/image/source".to_string()));
    };
    let media_type = uploaded.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);
    inline_image(uploaded.data, media_type)
}

pub(crate) async fn result_image_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ReimagineError> {
    let snapshot = state.editor_for(&session).await?.snapshot();
    let Some(generated) = snapshot.generated else {
        return Err(ReimagineError::NotFound("/image/result".to_string()));
    };
    inline_image(decode(&generated.data)?, &generated.mime_type)
}

pub(crate) async fn download_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ReimagineError> {
    let snapshot = state.editor_for(&session).await?.snapshot();
    let Some(generated) = snapshot.generated else {
        return Err(ReimagineError::NotFound("/download".to_string()));
    };
    let filename = query
        .filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_FILENAME.to_string());
    info!("Delivering generated image as {}", filename);
    package_as_downloadable(decode(&generated.data)?, DOWNLOAD_MEDIA_TYPE, &filename)
}
