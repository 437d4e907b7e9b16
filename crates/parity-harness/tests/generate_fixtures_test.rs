//! End-to-end fixture generation over the in-tree baseline engine.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Value, json};

use prompt_parity_exec::DefaultBaseline;
use prompt_parity_harness::generate_fixtures;

fn generate_into_temp() -> (tempfile::TempDir, std::path::PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("prompt_parity");
    let summary = generate_fixtures::<DefaultBaseline>(&dir).unwrap();
    assert_eq!(summary.written, 19);
    (root, dir)
}

fn load_fixture(dir: &Path, case_id: &str) -> Value {
    let raw = fs::read_to_string(dir.join(format!("{case_id}.json"))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn generation_is_complete_and_removes_orphans() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("prompt_parity");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("orphan_case.json"), "{}\n").unwrap();

    generate_fixtures::<DefaultBaseline>(&dir).unwrap();

    let names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names.len(), 19);
    assert!(!names.contains(&"orphan_case.json".to_string()));
    assert!(names.contains(&"prompt_001_empty_prompt_error.json".to_string()));
    assert!(names.contains(&"configure_019_extra_field_order_preserved.json".to_string()));
    assert!(names.iter().all(|name| name.ends_with(".json")));
}

#[test]
fn regeneration_is_byte_identical() {
    let (_root, dir) = generate_into_temp();
    let first: BTreeMap<String, Vec<u8>> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().into_string().unwrap(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect();

    generate_fixtures::<DefaultBaseline>(&dir).unwrap();
    for (name, bytes) in &first {
        assert_eq!(&fs::read(dir.join(name)).unwrap(), bytes, "{name}");
    }
}

#[test]
fn fixture_files_are_canonical_json() {
    let (_root, dir) = generate_into_temp();
    for entry in fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n') && !raw.ends_with("\n\n"), "{path:?}");
        assert!(raw.starts_with("{\n  \""), "{path:?}");

        // Reparsing and reprinting reproduces the file: sorted keys at every
        // level, 2-space indent, unescaped UTF-8.
        let value: Value = serde_json::from_str(&raw).unwrap();
        let reprinted = format!("{}\n", serde_json::to_string_pretty(&value).unwrap());
        assert_eq!(raw, reprinted, "{path:?}");
    }
}

#[test]
fn empty_prompt_failure_is_recorded_as_data() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "prompt_001_empty_prompt_error");
    assert!(fixture.get("expected_text").is_none());
    assert!(fixture.get("expected_messages").is_none());
    let error = fixture["expected_text_error"].as_str().unwrap();
    assert!(error.contains("requires at least one of"));
    assert_eq!(fixture["expected_messages_error"].as_str().unwrap(), error);
    assert_eq!(fixture["expected_output_schema"], Value::Null);
    assert_eq!(
        fixture["expected_serializable_prompt"],
        json!({".agent": {}, ".request": {}})
    );
}

#[test]
fn rendered_text_never_contains_carriage_returns() {
    let (_root, dir) = generate_into_temp();
    for entry in fs::read_dir(&dir).unwrap() {
        let fixture: Value =
            serde_json::from_str(&fs::read_to_string(entry.unwrap().path()).unwrap()).unwrap();
        if let Some(text) = fixture.get("expected_text").and_then(Value::as_str) {
            assert!(!text.contains('\r'));
        }
    }
}

#[test]
fn input_only_case_renders_the_exact_text_layout() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "prompt_002_input_only");
    assert_eq!(
        fixture["expected_text"],
        json!("user:\n[INPUT]:\nhello\n\n[OUTPUT]:\nassistant:")
    );
    assert_eq!(
        fixture["expected_messages"],
        json!([{"role": "user", "content": "hello"}])
    );
}

#[test]
fn output_schema_keeps_declared_shape() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "prompt_003_full_slots_with_json_output");
    assert_eq!(
        fixture["expected_output_schema"],
        json!({
            "answer": {"$desc": "final answer", "$type": "str"},
            "steps": [{"$desc": "one step", "$type": "str"}],
        })
    );
    let text = fixture["expected_text"].as_str().unwrap();
    assert!(text.contains("Data Format: JSON"));
    assert!(text.contains("\"answer\": <str>, // final answer"));
}

#[test]
fn output_format_switches_the_requirement_block() {
    let (_root, dir) = generate_into_temp();
    let markdown = load_fixture(&dir, "prompt_004_output_format_markdown_manual");
    assert!(
        markdown["expected_text"]
            .as_str()
            .unwrap()
            .contains("Data Format: markdown text")
    );
    let text = load_fixture(&dir, "prompt_005_output_format_text_manual");
    assert!(!text["expected_text"].as_str().unwrap().contains("Data Format"));
}

#[test]
fn role_mapping_in_message_options_is_recorded_but_not_forwarded() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "prompt_006_role_mapping_override");
    assert!(fixture["message_options"].get("role_mapping").is_some());
    let messages = fixture["expected_messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], json!("system"));
    assert_eq!(messages[0]["content"], json!("You are mapped"));
}

#[test]
fn strict_role_orders_changes_the_message_count() {
    let (_root, dir) = generate_into_temp();
    let loose = load_fixture(&dir, "prompt_008_chat_history_strict_false");
    let strict = load_fixture(&dir, "prompt_009_chat_history_strict_true");
    let loose_messages = loose["expected_messages"].as_array().unwrap();
    let strict_messages = strict["expected_messages"].as_array().unwrap();
    assert_eq!(loose_messages.len(), 4);
    assert_eq!(strict_messages.len(), 5);

    // Same history, merged vs verbatim.
    assert_eq!(loose_messages[0]["content"], json!("A1"));
    assert_eq!(loose_messages[1]["content"], json!("A2"));
    assert_eq!(strict_messages[0]["content"], json!("[CHAT HISTORY]"));
    assert_eq!(strict_messages[1]["content"], json!("A1\n\nA2"));
    assert_eq!(strict_messages[2]["content"], json!("U1"));
    assert_eq!(strict_messages[3]["content"], json!("[User continue input]"));
    assert_eq!(strict_messages[4]["content"], json!("Q"));
}

#[test]
fn rich_content_keeps_structured_history_parts() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "prompt_010_chat_history_rich_content");
    let messages = fixture["expected_messages"].as_array().unwrap();
    let assistant_parts = messages[1]["content"].as_array().unwrap();
    assert!(assistant_parts.iter().any(|part| part["type"] == json!("image_url")));
}

#[test]
fn attachment_only_cases_differ_by_rich_content() {
    let (_root, dir) = generate_into_temp();
    let flat = load_fixture(&dir, "prompt_011_attachment_only_rich_false");
    assert_eq!(
        flat["expected_messages"],
        json!([{"role": "user", "content": "text-a"}])
    );
    let rich = load_fixture(&dir, "prompt_012_attachment_only_rich_true");
    let content = rich["expected_messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
}

#[test]
fn configure_mappings_substitute_keys_and_values() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "configure_013_yaml_basic_mappings");
    let snapshot = &fixture["expected_serializable_prompt"];
    assert_eq!(snapshot[".agent"]["system"], json!("You are assistant"));
    assert_eq!(snapshot[".agent"]["persona"], json!("teacher"));
    assert_eq!(snapshot[".request"]["input"], json!("Ask recursion"));
    assert_eq!(snapshot[".request"]["note"], json!("from-yaml"));
}

#[test]
fn prompt_key_path_selects_the_nested_profile() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "configure_014_json_prompt_key_path");
    let snapshot = &fixture["expected_serializable_prompt"];
    assert_eq!(snapshot[".agent"]["system"], json!("SYS N1"));
    assert_eq!(snapshot[".request"]["input"], json!("IN T1"));
    assert_eq!(
        fixture["expected_output_schema"],
        json!({"reply": {"$type": "str"}})
    );
}

#[test]
fn dot_style_output_markers_convert_to_dollar_form() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "configure_015_output_type_desc_conversion");
    assert_eq!(
        fixture["expected_output_schema"],
        json!({
            "answer": {"$desc": "final answer", "$type": "str"},
            "extra": {
                "$desc": "extra block",
                "$type": {"detail": {"$type": "str"}},
            },
        })
    );
}

#[test]
fn alias_invocation_sets_the_requested_field() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "configure_016_alias_set_request_prompt");
    assert_eq!(
        fixture["expected_serializable_prompt"][".request"]["instruct"],
        json!("Reply politely.")
    );
}

#[test]
fn roundtrips_match_a_direct_seed_of_the_same_data() {
    let (_root, dir) = generate_into_temp();
    let yaml = load_fixture(&dir, "configure_017_roundtrip_yaml");
    let json_trip = load_fixture(&dir, "configure_018_roundtrip_json");
    let expected = json!({
        ".agent": {"system": "SYS"},
        ".request": {"input": "IN", "output": {"answer": {"$type": "str"}}},
    });
    assert_eq!(yaml["expected_serializable_prompt"], expected);
    assert_eq!(json_trip["expected_serializable_prompt"], expected);
    assert_eq!(yaml["expected_text"], json_trip["expected_text"]);
    assert_eq!(yaml["expected_messages"], json_trip["expected_messages"]);

    // Export then reimport renders exactly like applying the data directly.
    let direct = prompt_parity_harness::Case {
        case_id: "direct_seed".to_string(),
        mode: "direct".to_string(),
        settings: json!({}),
        message_options: json!({"rich_content": false, "strict_role_orders": true}),
        prompt_data: yaml.get("prompt_data").cloned(),
        configure: None,
    };
    let engine: DefaultBaseline = prompt_parity_harness::runner::run_case(&direct).unwrap();
    let expectations =
        prompt_parity_harness::collect::collect_expectations(&engine, &direct.message_options);
    assert_eq!(yaml["expected_text"], json!(expectations.text.unwrap()));
}

#[test]
fn extra_fields_render_in_authoring_order() {
    let (_root, dir) = generate_into_temp();
    let fixture = load_fixture(&dir, "configure_019_extra_field_order_preserved");
    let text = fixture["expected_text"].as_str().unwrap();
    let persona = text.find("[persona]:").unwrap();
    let style = text.find("[style]:").unwrap();
    let goal = text.find("[goal]:").unwrap();
    let hint = text.find("[hint]:").unwrap();
    assert!(persona < style && style < goal && goal < hint);
}
