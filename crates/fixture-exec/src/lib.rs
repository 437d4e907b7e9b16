//! Execution seam between the parity harness and a baseline engine.
//!
//! The harness never talks to a concrete engine directly; it drives anything
//! implementing [`BaselineEngine`]. Each instance is created from an
//! [`InstancePlan`] assembled up front, so an engine's observable state is a
//! function of the plan alone and never of call ordering. The in-tree
//! reference implementation is [`DefaultBaseline`].

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde_json::Value;

pub use prompt_parity_engine::{EngineError, MessageOptions, PromptFormat, Scope};

/// Fully-assembled configuration for one engine instance.
///
/// Settings and prompt fields are ordered lists, applied in list order at
/// creation time. The plan is complete before the instance exists; nothing
/// mutates an instance between creation and projection.
#[derive(Debug, Clone, Default)]
pub struct InstancePlan {
    /// Dotted-path settings, e.g. `("prompt.role_mapping", {...})`.
    pub settings: Vec<(String, Value)>,
    /// Agent-scope prompt fields.
    pub agent_fields: Vec<(String, Value)>,
    /// Request-scope prompt fields.
    pub request_fields: Vec<(String, Value)>,
}

/// The operations a baseline engine must expose to the harness.
pub trait BaselineEngine: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds an instance in its final configured state.
    fn create(plan: &InstancePlan) -> Self;

    /// Loads a YAML/JSON configure document, optionally narrowed to a dotted
    /// `prompt_key_path` inside it.
    fn load_prompt(
        &mut self,
        format: PromptFormat,
        content: &str,
        mappings: &BTreeMap<String, Value>,
        prompt_key_path: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Exports both scopes as a configure document `load_prompt` accepts back.
    fn export_prompt(&self, format: PromptFormat) -> Result<String, Self::Error>;

    fn to_text(&self) -> Result<String, Self::Error>;

    fn to_messages(&self, options: MessageOptions) -> Result<Value, Self::Error>;

    /// Lossless snapshot of one scope.
    fn serializable_prompt(&self, scope: Scope, inherit: bool) -> Value;

    /// The `output` field of the non-inherited request snapshot, `Null` when
    /// absent.
    fn output_schema(&self, inherit: bool) -> Value;
}

impl BaselineEngine for prompt_parity_engine::Engine {
    type Error = EngineError;

    fn create(plan: &InstancePlan) -> Self {
        let mut engine = Self::new();
        for (key, value) in &plan.settings {
            engine.set_setting(key, value.clone());
        }
        for (key, value) in &plan.agent_fields {
            engine.set_agent_prompt(key, value.clone());
        }
        for (key, value) in &plan.request_fields {
            engine.set_request_prompt(key, value.clone());
        }
        engine
    }

    fn load_prompt(
        &mut self,
        format: PromptFormat,
        content: &str,
        mappings: &BTreeMap<String, Value>,
        prompt_key_path: Option<&str>,
    ) -> Result<(), Self::Error> {
        prompt_parity_engine::Engine::load_prompt(self, format, content, mappings, prompt_key_path)
    }

    fn export_prompt(&self, format: PromptFormat) -> Result<String, Self::Error> {
        prompt_parity_engine::Engine::export_prompt(self, format)
    }

    fn to_text(&self) -> Result<String, Self::Error> {
        prompt_parity_engine::Engine::to_text(self)
    }

    fn to_messages(&self, options: MessageOptions) -> Result<Value, Self::Error> {
        prompt_parity_engine::Engine::to_messages(self, options, None)
    }

    fn serializable_prompt(&self, scope: Scope, inherit: bool) -> Value {
        prompt_parity_engine::Engine::serializable_prompt(self, scope, inherit)
    }

    fn output_schema(&self, inherit: bool) -> Value {
        prompt_parity_engine::Engine::output_schema(self, inherit)
    }
}

/// The reference engine the harness snapshots by default.
pub type DefaultBaseline = prompt_parity_engine::Engine;
