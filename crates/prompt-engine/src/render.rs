//! Prompt projections: text rendering, message-list rendering, and the
//! output-schema view.
//!
//! Rendering works on the merged (request-over-agent) view. Role and section
//! titles come from built-in defaults overlaid with the
//! `prompt.role_mapping` / `prompt.prompt_title_mapping` settings and, for
//! messages, per-call role overrides.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::error::EngineError;
use crate::output;
use crate::prompt::{Engine, Scope};
use crate::value::scalar_text;

/// Message-rendering toggles.
#[derive(Debug, Clone, Copy)]
pub struct MessageOptions {
    /// Keep structured multi-part content instead of flattening to text.
    pub rich_content: bool,
    /// Merge consecutive same-role history entries and synthesize canonical
    /// leading-user / trailing-assistant entries.
    pub strict_role_orders: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            rich_content: false,
            strict_role_orders: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markdown,
    Text,
}

/// Typed view over the merged prompt entries.
#[derive(Default)]
struct Snapshot<'a> {
    system: Option<&'a Value>,
    developer: Option<&'a Value>,
    chat_history: Vec<&'a Value>,
    info: Option<&'a Value>,
    tools: Vec<&'a Value>,
    action_results: Option<&'a Value>,
    instruct: Option<&'a Value>,
    examples: Option<&'a Value>,
    input: Option<&'a Value>,
    attachment: Vec<&'a Value>,
    output: Option<&'a Value>,
    output_format: OutputFormat,
    extra: Vec<(&'a str, &'a Value)>,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json
    }
}

impl<'a> Snapshot<'a> {
    fn ensure_renderable(&self) -> Result<(), EngineError> {
        let empty = self.input.is_none()
            && self.info.is_none()
            && self.instruct.is_none()
            && self.output.is_none()
            && self.attachment.is_empty()
            && self.extra.is_empty();
        if empty {
            return Err(EngineError::EmptyPrompt);
        }
        Ok(())
    }
}

fn present(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

fn list_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

impl Engine {
    fn snapshot(&self) -> Snapshot<'_> {
        let mut snapshot = Snapshot::default();
        for (key, value) in self.merged_entries() {
            match key {
                "system" => snapshot.system = present(value),
                "developer" => snapshot.developer = present(value),
                "chat_history" => snapshot.chat_history = list_items(value),
                "info" => snapshot.info = present(value),
                "tools" => snapshot.tools = list_items(value),
                "action_results" => snapshot.action_results = present(value),
                "instruct" => snapshot.instruct = present(value),
                "examples" => snapshot.examples = present(value),
                "input" => snapshot.input = present(value),
                "attachment" => snapshot.attachment = list_items(value),
                "output" => snapshot.output = present(value),
                "output_format" => {
                    snapshot.output_format = match value.as_str() {
                        Some("markdown") => OutputFormat::Markdown,
                        Some("text") => OutputFormat::Text,
                        _ => OutputFormat::Json,
                    }
                }
                "options" => {}
                extra_key => {
                    if let Some(value) = present(value) {
                        snapshot.extra.push((extra_key, value));
                    }
                }
            }
        }
        snapshot
    }

    fn role_mapping(&self, overrides: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
        let mut roles: BTreeMap<String, String> = [
            ("system", "system"),
            ("developer", "developer"),
            ("assistant", "assistant"),
            ("user", "user"),
            ("_", "assistant"),
        ]
        .into_iter()
        .map(|(key, role)| (key.to_string(), role.to_string()))
        .collect();
        if let Some(Value::Object(configured)) = self.settings.get("prompt.role_mapping") {
            for (key, role) in configured {
                roles.insert(key.clone(), scalar_text(role));
            }
        }
        if let Some(overrides) = overrides {
            for (key, role) in overrides {
                roles.insert(key.clone(), role.clone());
            }
        }
        roles
    }

    fn title_mapping(&self) -> BTreeMap<String, String> {
        let mut titles: BTreeMap<String, String> = [
            ("system", "SYSTEM"),
            ("developer", "DEVELOPER DIRECTIONS"),
            ("chat_history", "CHAT HISTORY"),
            ("info", "INFO"),
            ("tools", "TOOLS"),
            ("action_results", "ACTION RESULTS"),
            ("instruct", "INSTRUCT"),
            ("examples", "EXAMPLES"),
            ("input", "INPUT"),
            ("output", "OUTPUT"),
            ("output_requirement", "OUTPUT REQUIREMENT"),
        ]
        .into_iter()
        .map(|(key, title)| (key.to_string(), title.to_string()))
        .collect();
        if let Some(Value::Object(configured)) = self.settings.get("prompt.prompt_title_mapping") {
            for (key, title) in configured {
                titles.insert(key.clone(), scalar_text(title));
            }
        }
        titles
    }

    /// Renders the merged prompt as one text block.
    pub fn to_text(&self) -> Result<String, EngineError> {
        let snapshot = self.snapshot();
        snapshot.ensure_renderable()?;
        let roles = self.role_mapping(None);
        let titles = self.title_mapping();

        let mut lines = vec![format!("{}:", roles["user"])];
        if let Some(system) = snapshot.system {
            lines.extend(section_block(&titles["system"], system));
        }
        if let Some(developer) = snapshot.developer {
            lines.extend(section_block(&titles["developer"], developer));
        }
        if !snapshot.chat_history.is_empty() {
            lines.push(format!("[{}]:", titles["chat_history"]));
            for message in &snapshot.chat_history {
                let role = mapped_role(message, &roles);
                for text_line in content_text_lines(message.get("content")) {
                    lines.push(format!("[{role}]:{text_line}"));
                }
            }
            lines.push(String::new());
        }
        lines.extend(main_prompt_lines(&snapshot, &titles));
        lines.push(format!("{}:", roles["assistant"]));
        Ok(lines.join("\n"))
    }

    /// Renders the merged prompt as an ordered list of role-tagged messages.
    pub fn to_messages(
        &self,
        options: MessageOptions,
        role_overrides: Option<&BTreeMap<String, String>>,
    ) -> Result<Value, EngineError> {
        let snapshot = self.snapshot();
        snapshot.ensure_renderable()?;
        let roles = self.role_mapping(role_overrides);
        let titles = self.title_mapping();

        let mut messages: Vec<Value> = Vec::new();
        if let Some(system) = snapshot.system {
            messages.push(json!({"role": roles["system"], "content": serialize_content(system)}));
        }
        if let Some(developer) = snapshot.developer {
            messages
                .push(json!({"role": roles["developer"], "content": serialize_content(developer)}));
        }

        let mut history: Vec<(String, Vec<Value>)> = Vec::new();
        for message in &snapshot.chat_history {
            let role = mapped_role(message, &roles);
            let content = rich_content_items(message.get("content"));
            let merge = options.strict_role_orders
                && history.last().is_some_and(|(last_role, _)| *last_role == role);
            if merge {
                if let Some((_, last_content)) = history.last_mut() {
                    last_content.extend(content);
                }
            } else {
                history.push((role, content));
            }
        }
        if options.strict_role_orders && !history.is_empty() {
            if history[0].0 != "user" {
                let opener = format!("[{}]", titles["chat_history"]);
                history.insert(0, ("user".to_string(), vec![text_item(&opener)]));
            }
            if history
                .last()
                .is_some_and(|(role, _)| role != "assistant")
            {
                history.push(("assistant".to_string(), vec![text_item("[User continue input]")]));
            }
        }
        for (role, content) in history {
            let content = if options.rich_content {
                Value::Array(content)
            } else {
                Value::String(flatten_text(&content))
            };
            messages.push(json!({"role": role, "content": content}));
        }

        let rest_empty = snapshot.tools.is_empty()
            && snapshot.action_results.is_none()
            && snapshot.info.is_none()
            && snapshot.instruct.is_none()
            && snapshot.output.is_none()
            && snapshot.extra.is_empty();
        if let Some(input) = snapshot.input
            && rest_empty
            && snapshot.attachment.is_empty()
        {
            messages.push(json!({"role": roles["user"], "content": serialize_content(input)}));
            return Ok(Value::Array(messages));
        }
        if !snapshot.attachment.is_empty() && rest_empty && snapshot.input.is_none() {
            if options.rich_content {
                let content = attachments_rich(&snapshot.attachment);
                messages.push(json!({"role": roles["user"], "content": content}));
            } else {
                for text in attachment_texts(&snapshot.attachment) {
                    messages.push(json!({"role": roles["user"], "content": text}));
                }
            }
            return Ok(Value::Array(messages));
        }

        let main = main_prompt_lines(&snapshot, &titles).join("\n");
        if options.rich_content {
            let mut content = vec![text_item(&main)];
            content.extend(attachments_rich(&snapshot.attachment));
            messages.push(json!({"role": roles["user"], "content": content}));
        } else {
            for text in attachment_texts(&snapshot.attachment) {
                messages.push(json!({"role": roles["user"], "content": text}));
            }
            messages.push(json!({"role": roles["user"], "content": main}));
        }
        Ok(Value::Array(messages))
    }

    /// Declarative output-shape definition, `Null` when no `output` field is
    /// present in the selected view.
    #[must_use]
    pub fn output_schema(&self, inherit: bool) -> Value {
        self.serializable_prompt(Scope::Request, inherit)
            .get("output")
            .cloned()
            .unwrap_or(Value::Null)
    }
}

fn mapped_role(message: &Value, roles: &BTreeMap<String, String>) -> String {
    let raw = message
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or_default();
    roles
        .get(raw)
        .or_else(|| roles.get("_"))
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}

fn section_block(title: &str, value: &Value) -> Vec<String> {
    vec![format!("[{title}]:"), serialize_content(value), String::new()]
}

/// Scalar values render as-is; structured values render as a YAML fragment,
/// trailing newline included.
fn serialize_content(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => scalar_text(value),
        structured => serde_yaml::to_string(structured).unwrap_or_default(),
    }
}

fn main_prompt_lines(snapshot: &Snapshot<'_>, titles: &BTreeMap<String, String>) -> Vec<String> {
    let mut lines = Vec::new();

    if !snapshot.tools.is_empty() {
        lines.push(format!("[{}]:", titles["tools"]));
        for tool in &snapshot.tools {
            lines.push("[".to_string());
            lines.push(format!(
                "name: {}",
                scalar_text(tool.get("name").unwrap_or(&Value::Null))
            ));
            lines.push(format!(
                "desc: {}",
                scalar_text(tool.get("desc").unwrap_or(&Value::Null))
            ));
            if let Some(kwargs) = tool.get("kwargs") {
                lines.push(format!(
                    "kwargs: {}",
                    output::render_structure(&output_spec(kwargs), 0)
                ));
            }
            if let Some(returns) = tool.get("returns") {
                lines.push(format!(
                    "returns: {}",
                    output::render_structure(&output_spec(returns), 0)
                ));
            }
            lines.push("]".to_string());
        }
    }

    if let Some(action_results) = snapshot.action_results {
        lines.extend(section_block(&titles["action_results"], action_results));
    }

    if let Some(info) = snapshot.info {
        lines.push(format!("[{}]:", titles["info"]));
        match info {
            Value::Object(map) => {
                for (key, value) in map {
                    lines.push(format!("- {key}: {}", scalar_text(value)));
                }
            }
            Value::Array(items) => {
                for item in items {
                    lines.push(format!("- {}", scalar_text(item)));
                }
            }
            other => lines.push(scalar_text(other)),
        }
        lines.push(String::new());
    }

    for (key, value) in &snapshot.extra {
        lines.extend(section_block(key, value));
    }

    if let Some(instruct) = snapshot.instruct {
        lines.extend(section_block(&titles["instruct"], instruct));
    }
    if let Some(examples) = snapshot.examples {
        lines.extend(section_block(&titles["examples"], examples));
    }
    if let Some(input) = snapshot.input {
        lines.extend(section_block(&titles["input"], input));
    }

    if let Some(shape) = snapshot.output {
        match snapshot.output_format {
            OutputFormat::Json => {
                lines.push(format!("[{}]:", titles["output_requirement"]));
                lines.push("Data Format: JSON".to_string());
                lines.push("Data Structure:".to_string());
                lines.push(output::render_structure(&output_spec(shape), 0));
                lines.push(String::new());
            }
            OutputFormat::Markdown => {
                lines.push(format!("[{}]:", titles["output_requirement"]));
                lines.push("Data Format: markdown text".to_string());
            }
            OutputFormat::Text => {}
        }
    }

    lines.push(format!("[{}]:", titles["output"]));
    lines
}

fn output_spec(shape: &Value) -> crate::output::OutputSpec {
    crate::output::normalize(shape)
}

fn text_item(text: &str) -> Value {
    json!({"type": "text", "text": text})
}

/// Lifts arbitrary history content into the structured item list.
fn rich_content_items(content: Option<&Value>) -> Vec<Value> {
    match content {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) if map.contains_key("type") => Some(item.clone()),
                Value::Object(_) => None,
                other => Some(text_item(&scalar_text(other))),
            })
            .collect(),
        Some(Value::Object(map)) if map.contains_key("type") => {
            vec![Value::Object(map.clone())]
        }
        Some(other) => vec![text_item(&scalar_text(other))],
        None => Vec::new(),
    }
}

fn content_text_lines(content: Option<&Value>) -> Vec<String> {
    rich_content_items(content)
        .iter()
        .filter_map(|item| {
            (item.get("type").and_then(Value::as_str) == Some("text"))
                .then(|| scalar_text(item.get("text").unwrap_or(&Value::Null)))
        })
        .collect()
}

fn flatten_text(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(|item| {
            (item.get("type").and_then(Value::as_str) == Some("text"))
                .then(|| scalar_text(item.get("text").unwrap_or(&Value::Null)))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn attachments_rich(attachments: &[&Value]) -> Vec<Value> {
    attachments
        .iter()
        .map(|attachment| match attachment {
            Value::Object(map) if map.contains_key("type") => (*attachment).clone(),
            other => text_item(&scalar_text(other)),
        })
        .collect()
}

fn attachment_texts(attachments: &[&Value]) -> Vec<String> {
    attachments
        .iter()
        .filter_map(|attachment| {
            (attachment.get("type").and_then(Value::as_str) == Some("text"))
                .then(|| scalar_text(attachment.get("text").unwrap_or(&Value::Null)))
        })
        .filter(|text| !text.is_empty())
        .collect()
}
