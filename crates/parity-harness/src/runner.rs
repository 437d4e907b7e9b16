//! Case execution: catalog entry in, fully-configured baseline instance out.
//!
//! Each case builds one [`InstancePlan`] up front and hands it to
//! [`BaselineEngine::create`]; the runner never mutates an instance after
//! creation except through `load_prompt`, which is itself part of the mode.
//! Roundtrip modes seed a throwaway instance, export it, and replay the
//! export into a fresh settings-only instance.

use std::collections::BTreeMap;

use serde_json::Value;

use prompt_parity_exec::{BaselineEngine, InstancePlan, PromptFormat};

use crate::error::HarnessError;
use crate::fixture::{Case, ConfigureBlock};

pub fn run_case<E: BaselineEngine>(case: &Case) -> Result<E, HarnessError> {
    match case.mode.as_str() {
        "direct" => Ok(E::create(&full_plan(case)?)),
        "configure" => {
            let block = case.configure.as_ref().ok_or_else(|| malformed(case, "configure mode without a configure block"))?;
            let mut engine = E::create(&settings_plan(case));
            load_block(&mut engine, block).map_err(|err| engine_failure(case, err))?;
            Ok(engine)
        }
        "configure_roundtrip_yaml" => roundtrip(case, PromptFormat::Yaml),
        "configure_roundtrip_json" => roundtrip(case, PromptFormat::Json),
        other => Err(HarnessError::UnknownMode(other.to_string())),
    }
}

fn roundtrip<E: BaselineEngine>(case: &Case, format: PromptFormat) -> Result<E, HarnessError> {
    let seeded = E::create(&full_plan(case)?);
    let exported = seeded
        .export_prompt(format)
        .map_err(|err| engine_failure(case, err))?;
    let mut engine = E::create(&settings_plan(case));
    engine
        .load_prompt(format, &exported, &BTreeMap::new(), None)
        .map_err(|err| engine_failure(case, err))?;
    Ok(engine)
}

fn load_block<E: BaselineEngine>(engine: &mut E, block: &ConfigureBlock) -> Result<(), E::Error> {
    let format = if block.format == "yaml" {
        PromptFormat::Yaml
    } else {
        PromptFormat::Json
    };
    let mappings: BTreeMap<String, Value> = block
        .mappings
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();
    let key_path = (!block.prompt_key_path.is_empty()).then_some(block.prompt_key_path.as_str());
    engine.load_prompt(format, &block.content, &mappings, key_path)
}

fn settings_plan(case: &Case) -> InstancePlan {
    InstancePlan {
        settings: ordered_fields(Some(&case.settings)),
        ..InstancePlan::default()
    }
}

fn full_plan(case: &Case) -> Result<InstancePlan, HarnessError> {
    let prompt_data = case
        .prompt_data
        .as_ref()
        .ok_or_else(|| malformed(case, "mode requires prompt_data"))?;
    Ok(InstancePlan {
        settings: ordered_fields(Some(&case.settings)),
        agent_fields: ordered_fields(prompt_data.get(".agent")),
        request_fields: ordered_fields(prompt_data.get(".request")),
    })
}

/// Flattens an object into `(key, value)` pairs; serde_json objects iterate
/// in sorted key order, which is the application order the catalog assumes.
fn ordered_fields(source: Option<&Value>) -> Vec<(String, Value)> {
    source
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn malformed(case: &Case, message: &str) -> HarnessError {
    HarnessError::MalformedCase {
        case_id: case.case_id.clone(),
        message: message.to_string(),
    }
}

fn engine_failure(case: &Case, err: impl std::error::Error) -> HarnessError {
    HarnessError::Engine {
        case_id: case.case_id.clone(),
        message: err.to_string(),
    }
}
