//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the baseline engine.
///
/// `EmptyPrompt` is an expected, first-class outcome for deliberately
/// malformed inputs; the harness captures it as data. The remaining variants
/// are structural and abort fixture generation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "prompt requires at least one of 'input', 'info', 'instruct', 'output', 'attachment' or customize extra prompt keys to be provided"
    )]
    EmptyPrompt,

    /// The configured dotted selector named a path absent from the document.
    /// Kept as an opaque message on purpose; downstream suites compare the
    /// string, not a structured cause.
    #[error("cannot locate prompt_key_path: {0}")]
    PromptKeyPath(String),

    #[error("prompt config must be a mapping")]
    ConfigNotMapping,

    #[error("prompt document error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("prompt serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
