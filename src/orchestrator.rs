//! Runs generation attempts against one editing session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::codec;
use crate::error::GenerationError;
use crate::extract::extract;
use crate::model::ModelClient;
use crate::request;
use crate::session::{Action, GeneratedImage, GenerationJob, SessionState, UploadedImage};

/// What a call to [`Editor::generate`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Another generation was already outstanding; nothing happened.
    AlreadyInFlight,
    /// Validation failed; the model was not called.
    Rejected(GenerationError),
    /// A new image is stored in the session.
    Succeeded,
    /// The attempt failed; any earlier image is kept.
    Failed(GenerationError),
}

/// Owns one [`SessionState`] and is the only thing that changes it.
pub struct Editor {
    state: Mutex<SessionState>,
    client: Arc<dyn ModelClient>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("model", &self.client.model())
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// A fresh session using `client` for generation.
    pub fn new(client: Arc<dyn ModelClient>, default_instruction: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SessionState::new(default_instruction)),
            client,
        }
    }

    /// A copy of the current state, for display.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Whether a generation is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Applies an action under the session lock.
    pub fn dispatch(&self, action: Action) {
        let mut state = self.lock();
        let current = std::mem::take(&mut *state);
        *state = current.apply(action);
    }

    /// Replaces the photo, clearing the previous result, feedback and error.
    ///
    /// A generation still outstanding keeps its in-flight flag but its
    /// result is discarded when it settles.
    pub fn upload(&self, image: UploadedImage) {
        self.dispatch(Action::Upload(image));
    }

    /// Clears the session back to the default instruction.
    ///
    /// As with [`Editor::upload`], an outstanding result is discarded.
    pub fn reset(&self) {
        self.dispatch(Action::Reset);
    }

    /// Runs encode, build, invoke and extract for the current session.
    ///
    /// Returns immediately with [`GenerateOutcome::AlreadyInFlight`] while
    /// another attempt is outstanding. The in-flight flag is always cleared
    /// once this attempt settles or its future is dropped.
    pub async fn generate(&self, is_regeneration: bool) -> GenerateOutcome {
        let job = {
            let mut state = self.lock();
            if state.in_flight {
                debug!("Generation already in flight, dropping request");
                return GenerateOutcome::AlreadyInFlight;
            }
            let current = std::mem::take(&mut *state);
            match current.prepare(is_regeneration) {
                Ok(job) => {
                    *state = current.apply(Action::Started);
                    job
                }
                Err(err) => {
                    info!("Generation rejected: {}", err);
                    *state = current.apply(Action::Rejected(err.clone()));
                    return GenerateOutcome::Rejected(err);
                }
            }
        };

        let guard = InFlightGuard {
            editor: self,
            armed: true,
        };
        let result = self.run(job).await;
        let outcome = match &result {
            Ok(_) => GenerateOutcome::Succeeded,
            Err(err) => GenerateOutcome::Failed(err.clone()),
        };
        guard.finish(result);
        outcome
    }

    async fn run(&self, job: GenerationJob) -> Result<GeneratedImage, GenerationError> {
        info!(
            "Generating with model {} (regeneration: {}, instruction: {} chars)",
            self.client.model(),
            job.is_regeneration,
            job.instruction.effective(job.is_regeneration).chars().count()
        );
        let encoded = codec::encode(&job.image.data)?;
        let request = request::build(
            &job.instruction,
            job.is_regeneration,
            encoded,
            job.image.media_type.as_deref(),
        );
        let response = self.client.generate_content(&request).await?;
        match extract(&response) {
            Some(image) => {
                info!("Generation succeeded ({})", image.mime_type);
                Ok(image)
            }
            None => {
                warn!("Model response contained no inline image");
                Err(GenerationError::NoImageInResponse)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag if the generation future is dropped early.
struct InFlightGuard<'a> {
    editor: &'a Editor,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn finish(mut self, result: Result<GeneratedImage, GenerationError>) {
        if let Err(err) = &result {
            info!("Generation failed: {}", err);
        }
        self.armed = false;
        self.editor.dispatch(Action::Finished(result));
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Generation abandoned before the model responded");
            self.editor.dispatch(Action::Abandoned);
        }
    }
}
