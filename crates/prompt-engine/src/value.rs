//! Value plumbing shared by the engine: `${name}` placeholder substitution
//! and ordered YAML-document conversion.
//!
//! Substitution rules:
//! - a string that is, after trimming, exactly one `${name}` placeholder is
//!   replaced by the mapped value verbatim (type-preserving);
//! - placeholders embedded in longer text are replaced by the stringified
//!   mapped value;
//! - unknown names are left unexpanded.

use std::collections::BTreeMap;

use serde_json::Value;

/// Substitution table: placeholder name to replacement value.
pub type Mappings = BTreeMap<String, Value>;

/// Returns the placeholder name when `text` is exactly one `${name}`.
pub fn whole_placeholder(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix("${")?.strip_suffix('}')?;
    if inner.contains('}') || inner.contains("${") {
        return None;
    }
    Some(inner.trim())
}

/// Renders a value as plain text for embedded substitution and display.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replaces every embedded `${name}` occurrence in `text`; unknown names are
/// kept as-is, unterminated openers are copied through.
pub fn substitute_text(text: &str, mappings: &Mappings) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].trim();
                match mappings.get(name) {
                    Some(replacement) => out.push_str(&scalar_text(replacement)),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Substitutes a string, preserving the mapped value's type for whole-string
/// placeholders.
pub fn substitute_str(text: &str, mappings: &Mappings) -> Value {
    if let Some(name) = whole_placeholder(text) {
        if let Some(replacement) = mappings.get(name) {
            return replacement.clone();
        }
        return Value::String(text.to_string());
    }
    Value::String(substitute_text(text, mappings))
}

/// Substitutes a mapping key; non-string replacements are stringified.
pub fn substitute_key(key: &str, mappings: &Mappings) -> String {
    scalar_text(&substitute_str(key, mappings))
}

/// Recursively substitutes placeholders through strings, arrays, and object
/// keys/values.
pub fn substitute_value(value: &Value, mappings: &Mappings) -> Value {
    match value {
        Value::String(text) => substitute_str(text, mappings),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_value(item, mappings))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (substitute_key(key, mappings), substitute_value(item, mappings)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Stringifies a YAML mapping key.
pub fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(text) => text.clone(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => scalar_text(&yaml_to_json(other)),
    }
}

/// Converts a parsed YAML value into the engine's JSON value currency.
pub fn yaml_to_json(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Bool(*flag),
        serde_yaml::Value::Number(number) => {
            if let Some(signed) = number.as_i64() {
                Value::from(signed)
            } else if let Some(unsigned) = number.as_u64() {
                Value::from(unsigned)
            } else {
                number
                    .as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(text) => Value::String(text.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (key, item) in map {
                object.insert(yaml_key(key), yaml_to_json(item));
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
