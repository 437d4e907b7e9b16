//! Fixture schema: the case descriptor plus captured expectations.
//!
//! A fixture file is the case record with the expectation fields appended.
//! Projection failures and successes are mutually exclusive per projection:
//! a fixture carries `expected_text` or `expected_text_error`, never both.
//! `expected_output_schema` is always present and is `null` when the
//! request defines no output shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collect::Expectations;

/// One catalog entry: everything needed to reproduce a baseline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub case_id: String,
    /// Open-ended on purpose: unrecognized modes must stay representable so
    /// the runner can reject them at execution time.
    pub mode: String,
    /// Dotted-path settings, applied in sorted key order.
    pub settings: Value,
    /// Projection toggles. May carry extra descriptive keys (such as
    /// `role_mapping`) that are recorded verbatim but not forwarded.
    pub message_options: Value,
    /// `{".agent": {...}, ".request": {...}}` field maps for direct and
    /// roundtrip modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configure: Option<ConfigureBlock>,
}

/// Inputs for a configure-mode case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureBlock {
    pub content: String,
    /// `"yaml"` or `"json"`.
    pub format: String,
    /// Placeholder substitution table.
    pub mappings: Value,
    /// Dotted selector into the document; empty means the whole document.
    pub prompt_key_path: String,
}

/// A complete fixture record as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub case: Case,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_text_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_messages: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_messages_error: Option<String>,
    pub expected_output_schema: Value,
    pub expected_serializable_prompt: Value,
}

impl Fixture {
    #[must_use]
    pub fn new(case: Case, expectations: Expectations) -> Self {
        let (expected_text, expected_text_error) = split(expectations.text);
        let (expected_messages, expected_messages_error) = split(expectations.messages);
        Self {
            case,
            expected_text,
            expected_text_error,
            expected_messages,
            expected_messages_error,
            expected_output_schema: expectations.output_schema,
            expected_serializable_prompt: expectations.serializable_prompt,
        }
    }
}

fn split<T>(projection: Result<T, String>) -> (Option<T>, Option<String>) {
    match projection {
        Ok(value) => (Some(value), None),
        Err(message) => (None, Some(message)),
    }
}
