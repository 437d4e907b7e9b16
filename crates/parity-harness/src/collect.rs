//! Expectation capture.
//!
//! Text and message projections are fallible by design: an engine error
//! there is an expected outcome recorded as the projection's error string.
//! Snapshot projections are infallible reads of stored state.

use serde_json::{Value, json};

use prompt_parity_exec::{BaselineEngine, MessageOptions, Scope};

/// Captured projections for one case, success or failure per projection.
pub struct Expectations {
    pub text: Result<String, String>,
    pub messages: Result<Value, String>,
    pub output_schema: Value,
    pub serializable_prompt: Value,
}

/// Collapses `\r\n` and bare `\r` so fixtures are platform-independent.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn collect_expectations<E: BaselineEngine>(engine: &E, message_options: &Value) -> Expectations {
    // Only the two rendering toggles are forwarded. A role_mapping key in
    // message_options is descriptive fixture data; the baseline reads role
    // names from its settings.
    let options = MessageOptions {
        rich_content: message_options
            .get("rich_content")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        strict_role_orders: message_options
            .get("strict_role_orders")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    };

    let text = engine
        .to_text()
        .map(|text| normalize_line_endings(&text))
        .map_err(|err| err.to_string());
    let messages = engine.to_messages(options).map_err(|err| err.to_string());

    Expectations {
        text,
        messages,
        output_schema: engine.output_schema(false),
        serializable_prompt: json!({
            ".agent": engine.serializable_prompt(Scope::Agent, false),
            ".request": engine.serializable_prompt(Scope::Request, false),
        }),
    }
}
