//! Two-scope prompt store and the engine instance.
//!
//! Prompt fields are held as explicitly ordered `(key, value)` entries:
//! insertion order is semantically meaningful for rendering (extra sections
//! appear in authoring order) and no incidental map-iteration guarantee is
//! relied on. The request scope inherits the agent scope; merged views list
//! agent keys first, with request values winning on collision.

use serde_json::{Map, Value};

use crate::output;
use crate::settings::Settings;

/// Textual prompt exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFormat {
    Yaml,
    Json,
}

/// Prompt scope selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Fields persisting across requests.
    Agent,
    /// Fields scoped to a single invocation.
    Request,
}

/// Ordered top-level prompt fields for one scope.
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    entries: Vec<(String, Value)>,
}

impl PromptStore {
    /// Sets a field. A repeated key keeps its original position and takes the
    /// new value; string values are trimmed.
    pub fn set(&mut self, key: &str, value: Value) {
        let value = trim_string(value);
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }
}

fn trim_string(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.trim().to_string()),
        other => other,
    }
}

/// A baseline engine instance: settings plus agent- and request-scope
/// prompt stores in their final, fully-configured state.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub(crate) settings: Settings,
    agent: PromptStore,
    request: PromptStore,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: Settings::new(),
            agent: PromptStore::default(),
            request: PromptStore::default(),
        }
    }

    pub fn set_setting(&mut self, key: &str, value: Value) {
        self.settings.set(key, value);
    }

    pub fn set_agent_prompt(&mut self, key: &str, value: Value) {
        self.agent.set(key, value);
    }

    pub fn set_request_prompt(&mut self, key: &str, value: Value) {
        self.request.set(key, value);
    }

    pub fn set_prompt(&mut self, scope: Scope, key: &str, value: Value) {
        match scope {
            Scope::Agent => self.set_agent_prompt(key, value),
            Scope::Request => self.set_request_prompt(key, value),
        }
    }

    /// Merged view for rendering: agent entries first (agent order), request
    /// values overriding, request-only keys appended in request order.
    #[must_use]
    pub(crate) fn merged_entries(&self) -> Vec<(&str, &Value)> {
        let mut merged: Vec<(&str, &Value)> = Vec::new();
        for (key, value) in self.agent.entries() {
            let effective = self.request.get(key).unwrap_or(value);
            merged.push((key.as_str(), effective));
        }
        for (key, value) in self.request.entries() {
            if self.agent.get(key).is_none() {
                merged.push((key.as_str(), value));
            }
        }
        merged
    }

    fn scope_entries(&self, scope: Scope, inherit: bool) -> Vec<(&str, &Value)> {
        match (scope, inherit) {
            (Scope::Agent, _) => self
                .agent
                .entries()
                .iter()
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
            (Scope::Request, false) => self
                .request
                .entries()
                .iter()
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
            (Scope::Request, true) => self.merged_entries(),
        }
    }

    /// Lossless serializable snapshot of one scope. The `output` field is
    /// normalized to its `$type`/`$desc` form; other fields pass through.
    #[must_use]
    pub fn serializable_prompt(&self, scope: Scope, inherit: bool) -> Value {
        let mut object = Map::new();
        for (key, value) in self.scope_entries(scope, inherit) {
            let serialized = if key == "output" {
                output::serializable(value)
            } else {
                value.clone()
            };
            object.insert(key.to_string(), serialized);
        }
        Value::Object(object)
    }
}
