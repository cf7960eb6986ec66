//! State of one editing session and the transitions that change it.

use axum::body::Bytes;

use crate::error::GenerationError;
use crate::request::GenerationInstruction;

/// A photo supplied by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    /// Raw file content.
    pub data: Bytes,
    /// Declared media type, if the source supplied one.
    pub media_type: Option<String>,
}

impl UploadedImage {
    /// Wraps uploaded bytes.
    pub fn new(data: impl Into<Bytes>, media_type: Option<String>) -> Self {
        Self {
            data: data.into(),
            media_type,
        }
    }
}

/// Base64 image data returned by the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64 encoded bytes.
    pub data: String,
    /// Media type reported by the model.
    pub mime_type: String,
}

/// Where the session currently sits, derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing generated since the last upload or reset.
    Idle,
    /// A request is outstanding.
    Generating,
    /// The last attempt produced an image.
    Succeeded,
    /// The last attempt failed.
    Failed,
}

/// Everything the session transition function accepts.
#[derive(Clone, Debug)]
pub enum Action {
    /// A new photo replaces the old one.
    Upload(UploadedImage),
    /// The instruction text was edited.
    SetInstruction(String),
    /// The feedback text was edited.
    SetFeedback(String),
    /// Start over with the default instruction.
    Reset,
    /// Generate failed validation and never started.
    Rejected(GenerationError),
    /// A validated generation is now in flight.
    Started,
    /// The in-flight generation settled. Its result is dropped when an
    /// upload or reset happened since it started.
    Finished(Result<GeneratedImage, GenerationError>),
    /// The in-flight generation was dropped before settling.
    Abandoned,
}

/// Inputs captured for one validated generation attempt.
#[derive(Clone, Debug)]
pub struct GenerationJob {
    /// Photo to edit.
    pub image: UploadedImage,
    /// Instruction and feedback as they stood when the attempt started.
    pub instruction: GenerationInstruction,
    /// Whether feedback may amend the instruction.
    pub is_regeneration: bool,
}

/// The single mutable context of an editing session.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Current photo.
    pub uploaded: Option<UploadedImage>,
    /// Current instruction text.
    pub instruction: String,
    /// Current feedback text.
    pub feedback: String,
    /// Latest generated image.
    pub generated: Option<GeneratedImage>,
    /// Error from the latest attempt.
    pub error: Option<GenerationError>,
    /// Whether a generation is outstanding.
    pub in_flight: bool,
    default_instruction: String,
    // Set when an upload or reset lands while a generation is outstanding.
    discard_outstanding: bool,
}

impl SessionState {
    /// A fresh session whose instruction starts at `default_instruction`.
    pub fn new(default_instruction: impl Into<String>) -> Self {
        let default_instruction = default_instruction.into();
        Self {
            instruction: default_instruction.clone(),
            default_instruction,
            ..Default::default()
        }
    }

    /// The instruction restored on reset.
    pub fn default_instruction(&self) -> &str {
        &self.default_instruction
    }

    /// Derives the presentation phase.
    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Generating
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.generated.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    /// Validates the session for a generate action and captures its inputs.
    ///
    /// A missing photo is reported before a blank instruction.
    pub fn prepare(&self, is_regeneration: bool) -> Result<GenerationJob, GenerationError> {
        let Some(image) = self.uploaded.clone() else {
            return Err(GenerationError::MissingImage);
        };
        if self.instruction.trim().is_empty() {
            return Err(GenerationError::EmptyInstruction);
        }
        let mut instruction = GenerationInstruction::new(self.instruction.clone());
        if !self.feedback.is_empty() {
            instruction = instruction.with_feedback(self.feedback.clone());
        }
        Ok(GenerationJob {
            image,
            instruction,
            is_regeneration,
        })
    }

    /// Applies one action and returns the next state.
    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::Upload(image) => Self {
                uploaded: Some(image),
                generated: None,
                feedback: String::new(),
                error: None,
                discard_outstanding: self.in_flight,
                ..self
            },
            Action::SetInstruction(instruction) => Self {
                instruction,
                ..self
            },
            Action::SetFeedback(feedback) => Self { feedback, ..self },
            Action::Reset => Self {
                uploaded: None,
                generated: None,
                feedback: String::new(),
                error: None,
                instruction: self.default_instruction.clone(),
                discard_outstanding: self.in_flight,
                ..self
            },
            Action::Rejected(err) => Self {
                error: Some(err),
                ..self
            },
            Action::Started => Self {
                in_flight: true,
                error: None,
                discard_outstanding: false,
                ..self
            },
            Action::Finished(_) | Action::Abandoned if self.discard_outstanding => Self {
                in_flight: false,
                discard_outstanding: false,
                ..self
            },
            Action::Finished(Ok(image)) => Self {
                generated: Some(image),
                error: None,
                in_flight: false,
                ..self
            },
            Action::Finished(Err(err)) => Self {
                error: Some(err),
                in_flight: false,
                ..self
            },
            Action::Abandoned => Self {
                in_flight: false,
                ..self
            },
        }
    }
}
