//! Browser front end: one editing session per cookie session.

use std::collections::HashMap;
use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{debug, error, info};

use crate::constants::{EDITOR_SESSION_KEY, MAX_UPLOAD_BYTES, SESSION_INACTIVITY_MINUTES};
use crate::error::ReimagineError;
use crate::model::ModelClient;
use crate::orchestrator::Editor;

mod actions;
mod csrf;
mod images;
mod prelude;
mod views;

use actions::{generate_handler, regenerate_handler, reset_handler, upload_handler};
use images::{download_handler, result_image_handler, source_image_handler};
use views::root_handler;

#[derive(Clone, Debug)]
struct EditorSlot {
    editor: Arc<Editor>,
    last_seen: Instant,
}

#[derive(Clone)]
pub(crate) struct AppState {
    client: Arc<dyn ModelClient>,
    default_instruction: String,
    editors: Arc<RwLock<HashMap<String, EditorSlot>>>,
}

impl AppState {
    fn new(client: Arc<dyn ModelClient>, default_instruction: &str) -> Self {
        Self {
            client,
            default_instruction: default_instruction.to_string(),
            editors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Finds the editor bound to this cookie session, creating both on first use.
    pub(crate) async fn editor_for(
        &self,
        session: &Session,
    ) -> Result<Arc<Editor>, ReimagineError> {
        let id = match session.get::<String>(EDITOR_SESSION_KEY).await? {
            Some(id) => id,
            None => {
                let id = csrf::random_token();
                session.insert(EDITOR_SESSION_KEY, id.clone()).await?;
                debug!("Started editing session {}", id);
                id
            }
        };

        let mut editors = self.editors.write().await;
        let slot = editors.entry(id).or_insert_with(|| EditorSlot {
            editor: Arc::new(Editor::new(
                self.client.clone(),
                self.default_instruction.clone(),
            )),
            last_seen: Instant::now(),
        });
        slot.last_seen = Instant::now();
        Ok(slot.editor.clone())
    }

    /// Drops editors idle for longer than `max_idle`, keeping any mid-generation.
    async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut editors = self.editors.write().await;
        let before = editors.len();
        editors.retain(|_, slot| {
            slot.last_seen.elapsed() < max_idle || slot.editor.is_in_flight()
        });
        before - editors.len()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("model", &self.client.model())
            .finish_non_exhaustive()
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/static/styles.css", axum::routing::get(styles_handler))
        .route("/upload", axum::routing::post(upload_handler))
        .route("/generate", axum::routing::post(generate_handler))
        .route("/regenerate", axum::routing::post(regenerate_handler))
        .route("/reset", axum::routing::post(reset_handler))
        .route("/image/source", axum::routing::get(source_image_handler))
        .route("/image/result", axum::routing::get(result_image_handler))
        .route("/download", axum::routing::get(download_handler))
}

fn build_app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            SESSION_INACTIVITY_MINUTES,
        )));

    create_router()
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Serves the editor until interrupted.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    client: Arc<dyn ModelClient>,
    default_instruction: &str,
) -> Result<(), anyhow::Error> {
    let state = AppState::new(client, default_instruction);

    let max_idle = Duration::from_secs(SESSION_INACTIVITY_MINUTES.unsigned_abs() * 60);
    let pruner_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let pruned = pruner_state.prune_idle(max_idle).await;
            if pruned > 0 {
                debug!("Pruned {} idle editing sessions", pruned);
            }
        }
    });

    let app = build_app(state);
    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}
