//! Shared constants/setters for things
//!

/// Media type assumed for an upload that did not declare one.
pub const DEFAULT_MEDIA_TYPE: &str = "image/png";

/// Media type the generated image is delivered as.
pub const DOWNLOAD_MEDIA_TYPE: &str = "image/png";

/// File name offered when downloading the generated image.
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "generated.png";

/// Label placed in front of the feedback amendment in the effective instruction.
pub const FEEDBACK_LABEL: &str = "Feedback on the previous result:";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Base URL of the generative language API, trailing slash included.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Instruction a new or reset session starts with.
pub const DEFAULT_INSTRUCTION: &str = "Give this person a full, natural-looking head of hair with a \
well-defined hairline. Keep the face, expression, skin tone, lighting and background exactly as \
they are.";

/// Largest accepted upload body, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Session key holding the id of the browser's editing session.
pub const EDITOR_SESSION_KEY: &str = "editor_id";

/// Minutes of inactivity before a cookie session expires.
pub const SESSION_INACTIVITY_MINUTES: i64 = 120;
