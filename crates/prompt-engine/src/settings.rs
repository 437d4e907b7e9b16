//! Dotted-path settings store.
//!
//! Settings are applied as `(key, value)` pairs where the key is a dotted
//! path (`prompt.role_mapping`); rendering reads back through the same
//! paths. The store ships with the harness-pinned default
//! `prompt.add_current_time = false` so output never depends on wall time.

use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct Settings {
    root: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        let mut prompt = Map::new();
        prompt.insert("add_current_time".to_string(), Value::Bool(false));
        let mut root = Map::new();
        root.insert("prompt".to_string(), Value::Object(prompt));
        Self { root }
    }

    /// Sets a value at a dotted path, creating intermediate objects. A
    /// non-object intermediate is replaced rather than descended into.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut parts = key.split('.').peekable();
        let mut current = &mut self.root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                current.insert(part.to_string(), value);
                return;
            }
            let slot = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(map) => current = map,
                _ => unreachable!("slot was just made an object"),
            }
        }
    }

    /// Reads a value at a dotted path.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.root.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}
