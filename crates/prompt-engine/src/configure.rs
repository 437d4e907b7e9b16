//! Configure-document loading and prompt export.
//!
//! A configure document is an ordered mapping parsed from YAML or JSON text
//! (JSON is a YAML subset, so one ordered parser covers both). Top-level
//! keys route entries into the two prompt scopes:
//!
//! - `.agent` / `.request` blocks set fields in the named scope; an empty or
//!   scalar block falls back to setting `system` / `input` with the raw value;
//! - `.alias` invokes named setter shortcuts with positional `.args`;
//! - a `$key` (but not `${key}`) sets the agent scope under `key`;
//! - everything else sets the request scope.
//!
//! `${name}` placeholders in keys and values are substituted from the
//! supplied mappings table before storage.

use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::prompt::{Engine, PromptFormat, Scope};
use crate::value::{Mappings, scalar_text, substitute_key, substitute_value, yaml_key, yaml_to_json};

impl Engine {
    /// Loads a configure document into this instance. `prompt_key_path` is a
    /// dotted selector picking a sub-mapping of the document before routing.
    pub fn load_prompt(
        &mut self,
        _format: PromptFormat,
        content: &str,
        mappings: &Mappings,
        prompt_key_path: Option<&str>,
    ) -> Result<(), EngineError> {
        let document: serde_yaml::Value = serde_yaml::from_str(content)?;
        let document = match prompt_key_path.filter(|path| !path.is_empty()) {
            Some(path) => locate_path(&document, path)
                .ok_or_else(|| EngineError::PromptKeyPath(path.to_string()))?,
            None => &document,
        };
        let entries = match document.as_mapping() {
            Some(map) if !map.is_empty() => map,
            _ => return Err(EngineError::ConfigNotMapping),
        };
        for (key, value) in entries {
            match yaml_key(key).as_str() {
                ".agent" => self.apply_scope_block(Scope::Agent, "system", value, mappings),
                ".request" => self.apply_scope_block(Scope::Request, "input", value, mappings),
                ".alias" => self.apply_aliases(value, mappings),
                key if key.starts_with('$') && !key.starts_with("${") => {
                    self.set_configured(Scope::Agent, &key[1..], value, mappings);
                }
                key => self.set_configured(Scope::Request, key, value, mappings),
            }
        }
        Ok(())
    }

    /// Serializes both scopes as one `{".agent", ".request"}` document that
    /// [`Engine::load_prompt`] accepts back.
    pub fn export_prompt(&self, format: PromptFormat) -> Result<String, EngineError> {
        let mut payload = Map::new();
        payload.insert(
            ".agent".to_string(),
            self.serializable_prompt(Scope::Agent, false),
        );
        payload.insert(
            ".request".to_string(),
            self.serializable_prompt(Scope::Request, false),
        );
        let payload = Value::Object(payload);
        match format {
            PromptFormat::Json => Ok(serde_json::to_string_pretty(&payload)?),
            PromptFormat::Yaml => Ok(serde_yaml::to_string(&payload)?),
        }
    }

    fn apply_scope_block(
        &mut self,
        scope: Scope,
        fallback_key: &str,
        block: &serde_yaml::Value,
        mappings: &Mappings,
    ) {
        match block.as_mapping() {
            Some(map) if !map.is_empty() => {
                for (key, value) in map {
                    self.set_configured(scope, &yaml_key(key), value, mappings);
                }
            }
            _ => self.set_prompt(
                scope,
                fallback_key,
                substitute_value(&yaml_to_json(block), mappings),
            ),
        }
    }

    fn set_configured(
        &mut self,
        scope: Scope,
        key: &str,
        value: &serde_yaml::Value,
        mappings: &Mappings,
    ) {
        let resolved = substitute_key(key, mappings);
        let substituted = substitute_value(&yaml_to_json(value), mappings);
        self.set_prompt(scope, &resolved, substituted);
    }

    fn apply_aliases(&mut self, aliases: &serde_yaml::Value, mappings: &Mappings) {
        let Some(entries) = aliases.as_mapping() else {
            return;
        };
        for (name, spec) in entries {
            let scope = match yaml_key(name).as_str() {
                "set_request_prompt" => Scope::Request,
                "set_agent_prompt" => Scope::Agent,
                _ => continue,
            };
            let mut args: Vec<Value> = Vec::new();
            let mut local_mappings: Option<Mappings> = None;
            if let Some(params) = spec.as_mapping() {
                for (param, value) in params {
                    match yaml_key(param).as_str() {
                        ".args" => {
                            if let serde_yaml::Value::Sequence(items) = value {
                                args.extend(items.iter().map(yaml_to_json));
                            }
                        }
                        "mappings" => {
                            if let Value::Object(map) = yaml_to_json(value) {
                                local_mappings = Some(map.into_iter().collect());
                            }
                        }
                        _ => {}
                    }
                }
            }
            // A third positional argument may also carry a mappings table;
            // the keyword form wins.
            if local_mappings.is_none() {
                if let Some(Value::Object(map)) = args.get(2) {
                    local_mappings = Some(map.clone().into_iter().collect());
                }
            }
            let [key, value, ..] = args.as_slice() else {
                continue;
            };
            let table = local_mappings.as_ref().unwrap_or(mappings);
            let resolved = substitute_key(&scalar_text(key), table);
            self.set_prompt(scope, &resolved, substitute_value(value, table));
        }
    }
}

fn locate_path<'a>(
    document: &'a serde_yaml::Value,
    path: &str,
) -> Option<&'a serde_yaml::Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(document);
    }
    let mut current = document;
    for part in path.split('.') {
        let map = current.as_mapping()?;
        current = map
            .iter()
            .find(|(key, _)| yaml_key(key) == part)
            .map(|(_, value)| value)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mappings(pairs: &[(&str, Value)]) -> Mappings {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn load(engine: &mut Engine, content: &str) {
        engine
            .load_prompt(PromptFormat::Yaml, content, &Mappings::new(), None)
            .unwrap();
    }

    #[test]
    fn scope_blocks_route_into_their_scopes() {
        let mut engine = Engine::new();
        load(
            &mut engine,
            ".agent:\n  system: You are helpful\n.request:\n  input: hello\n",
        );
        assert_eq!(
            engine.serializable_prompt(Scope::Agent, false),
            json!({"system": "You are helpful"})
        );
        assert_eq!(
            engine.serializable_prompt(Scope::Request, false),
            json!({"input": "hello"})
        );
    }

    #[test]
    fn dollar_prefix_targets_agent_and_bare_keys_target_request() {
        let mut engine = Engine::new();
        load(&mut engine, "$system: persistent\ninput: transient\n");
        assert_eq!(
            engine.serializable_prompt(Scope::Agent, false),
            json!({"system": "persistent"})
        );
        assert_eq!(
            engine.serializable_prompt(Scope::Request, false),
            json!({"input": "transient"})
        );
    }

    #[test]
    fn placeholders_substitute_in_keys_and_values() {
        let mut engine = Engine::new();
        let table = mappings(&[("k", json!("note")), ("v", json!("from-yaml"))]);
        engine
            .load_prompt(
                PromptFormat::Yaml,
                "${k}: ${v}\ncount: \"${n}\"\n",
                &table,
                None,
            )
            .unwrap();
        let request = engine.serializable_prompt(Scope::Request, false);
        assert_eq!(request["note"], json!("from-yaml"));
        // Unknown names stay unexpanded.
        assert_eq!(request["count"], json!("${n}"));
    }

    #[test]
    fn key_path_selects_a_nested_block() {
        let mut engine = Engine::new();
        let content = "suites:\n  smoke:\n    system: SYS N1\n    input: IN T1\n";
        engine
            .load_prompt(
                PromptFormat::Yaml,
                content,
                &Mappings::new(),
                Some("suites.smoke"),
            )
            .unwrap();
        let request = engine.serializable_prompt(Scope::Request, false);
        assert_eq!(request, json!({"system": "SYS N1", "input": "IN T1"}));
    }

    #[test]
    fn missing_key_path_reports_the_full_selector() {
        let mut engine = Engine::new();
        let err = engine
            .load_prompt(
                PromptFormat::Yaml,
                "suites:\n  smoke:\n    input: hi\n",
                &Mappings::new(),
                Some("suites.missing.deep"),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot locate prompt_key_path: suites.missing.deep"
        );
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let mut engine = Engine::new();
        let err = engine
            .load_prompt(PromptFormat::Yaml, "- just\n- a\n- list\n", &Mappings::new(), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotMapping));
    }

    #[test]
    fn empty_scope_block_falls_back_to_default_field() {
        let mut engine = Engine::new();
        load(&mut engine, ".agent: base persona\n.request: {}\n");
        assert_eq!(
            engine.serializable_prompt(Scope::Agent, false),
            json!({"system": "base persona"})
        );
        assert_eq!(
            engine.serializable_prompt(Scope::Request, false),
            json!({"input": {}})
        );
    }

    #[test]
    fn aliases_invoke_scoped_setters_with_positional_args() {
        let mut engine = Engine::new();
        load(
            &mut engine,
            ".alias:\n  set_agent_prompt:\n    .args: [system, aliased persona]\n",
        );
        assert_eq!(
            engine.serializable_prompt(Scope::Agent, false),
            json!({"system": "aliased persona"})
        );
    }

    #[test]
    fn json_content_parses_with_order_preserved() {
        let mut engine = Engine::new();
        engine
            .load_prompt(
                PromptFormat::Json,
                "{\"zeta\": \"Z\", \"alpha\": \"A\", \"input\": \"go\"}",
                &Mappings::new(),
                None,
            )
            .unwrap();
        let text = engine.to_text().unwrap();
        let zeta = text.find("[zeta]:").unwrap();
        let alpha = text.find("[alpha]:").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn export_then_import_reproduces_both_scopes() {
        let mut engine = Engine::new();
        engine.set_agent_prompt("system", json!("persona"));
        engine.set_request_prompt("input", json!("ask"));
        engine.set_request_prompt("output", json!({"answer": {".type": "str"}}));

        for format in [PromptFormat::Yaml, PromptFormat::Json] {
            let exported = engine.export_prompt(format).unwrap();
            let mut restored = Engine::new();
            restored
                .load_prompt(format, &exported, &Mappings::new(), None)
                .unwrap();
            assert_eq!(
                restored.serializable_prompt(Scope::Agent, false),
                engine.serializable_prompt(Scope::Agent, false)
            );
            assert_eq!(
                restored.serializable_prompt(Scope::Request, false),
                engine.serializable_prompt(Scope::Request, false)
            );
        }
    }
}
