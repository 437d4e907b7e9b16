//! Output-shape normalization.
//!
//! An `output` prompt field is a declarative shape: mappings whose leaves
//! carry `$type`/`$desc` markers (configure documents may spell them
//! `.type`/`.desc`). Normalization turns either spelling into one internal
//! spec, which then serializes back to the canonical `$type`/`$desc` form
//! and renders as the JSON-structure block inside text prompts.

use serde_json::{Map, Value};

use crate::value::scalar_text;

/// Normalized output shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OutputSpec {
    /// A typed leaf: `$type` plus optional `$desc`.
    Leaf {
        ty: Box<OutputSpec>,
        desc: Option<String>,
    },
    Map(Vec<(String, OutputSpec)>),
    List(Vec<OutputSpec>),
    Scalar(Value),
}

pub(crate) fn normalize(value: &Value) -> OutputSpec {
    match value {
        Value::Object(map) => {
            let ty = map.get("$type").or_else(|| map.get(".type"));
            let desc = map.get("$desc").or_else(|| map.get(".desc"));
            if ty.is_some() || desc.is_some() {
                let ty_spec = ty
                    .map(normalize)
                    .unwrap_or_else(|| OutputSpec::Scalar(Value::String("Any".to_string())));
                return OutputSpec::Leaf {
                    ty: Box::new(ty_spec),
                    desc: desc.and_then(desc_text),
                };
            }
            OutputSpec::Map(
                map.iter()
                    .map(|(key, item)| (key.clone(), normalize(item)))
                    .collect(),
            )
        }
        Value::Array(items) => OutputSpec::List(items.iter().map(normalize).collect()),
        other => OutputSpec::Scalar(other.clone()),
    }
}

fn desc_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => Some(scalar_text(other)),
    }
}

/// Canonical serializable form of an output field.
#[must_use]
pub fn serializable(value: &Value) -> Value {
    spec_value(&normalize(value))
}

fn spec_value(spec: &OutputSpec) -> Value {
    match spec {
        OutputSpec::Leaf { ty, desc } => {
            let mut object = Map::new();
            object.insert("$type".to_string(), spec_value(ty));
            if let Some(desc) = desc {
                object.insert("$desc".to_string(), Value::String(desc.clone()));
            }
            Value::Object(object)
        }
        OutputSpec::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), spec_value(item)))
                .collect(),
        ),
        OutputSpec::List(items) => Value::Array(items.iter().map(spec_value).collect()),
        OutputSpec::Scalar(value) => value.clone(),
    }
}

/// Renders the shape as the indented pseudo-JSON block used in text prompts.
pub(crate) fn render_structure(spec: &OutputSpec, layer: usize) -> String {
    let indent = "  ".repeat(layer);
    let next_indent = "  ".repeat(layer + 1);
    match spec {
        OutputSpec::Map(entries) if entries.is_empty() => "{}".to_string(),
        OutputSpec::Map(entries) => {
            let mut lines = vec!["{".to_string()];
            for (index, (key, item)) in entries.iter().enumerate() {
                let rendered = render_structure(item, layer + 1);
                let comma = if index + 1 < entries.len() { "," } else { "" };
                lines.push(format!(
                    "{next_indent}\"{key}\": {rendered}{comma}{}",
                    desc_suffix(item)
                ));
            }
            lines.push(format!("{indent}}}"));
            lines.join("\n")
        }
        OutputSpec::List(items) if items.is_empty() => "[]".to_string(),
        OutputSpec::List(items) => {
            let mut lines = vec!["[".to_string()];
            for item in items {
                let rendered = render_structure(item, layer + 1);
                lines.push(format!("{next_indent}{rendered},{}", desc_suffix(item)));
            }
            lines.push(format!("{next_indent}..."));
            lines.push(format!("{indent}]"));
            lines.join("\n")
        }
        OutputSpec::Leaf { ty, .. } => match ty.as_ref() {
            OutputSpec::Map(_) | OutputSpec::List(_) => render_structure(ty, layer + 1),
            other => render_structure(other, layer),
        },
        OutputSpec::Scalar(value) => format!("<{}>", scalar_text(value)),
    }
}

fn desc_suffix(spec: &OutputSpec) -> String {
    match spec {
        OutputSpec::Leaf {
            desc: Some(desc), ..
        } => format!(" // {desc}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dollar_markers_serialize_canonically() {
        let shape = json!({"answer": {"$type": "str", "$desc": "final answer"}});
        assert_eq!(serializable(&shape), shape);
    }

    #[test]
    fn dot_markers_convert_to_dollar_form() {
        let shape = json!({
            "extra": {
                ".type": {"detail": {"$type": "str"}},
                ".desc": "extra block"
            }
        });
        assert_eq!(
            serializable(&shape),
            json!({
                "extra": {
                    "$type": {"detail": {"$type": "str"}},
                    "$desc": "extra block"
                }
            })
        );
    }

    #[test]
    fn lists_of_leaves_pass_through() {
        let shape = json!({"steps": [{"$type": "str", "$desc": "one step"}]});
        assert_eq!(serializable(&shape), shape);
    }

    #[test]
    fn structure_rendering_includes_types_and_descriptions() {
        let spec = normalize(&json!({
            "answer": {"$type": "str", "$desc": "final answer"},
            "steps": [{"$type": "str"}]
        }));
        let rendered = render_structure(&spec, 0);
        assert!(rendered.contains("\"answer\": <str>, // final answer"));
        assert!(rendered.contains("\"steps\": ["));
        assert!(rendered.contains("..."));
    }
}
