//! The fixed case catalog.
//!
//! Cases are listed in generation order. Object keys inside case data stay
//! alphabetical wherever possible to avoid map-order ambiguity; where order
//! itself is under test (extra prompt fields, configure documents) the
//! ordered configure content carries it.

use serde_json::{Value, json};

use crate::fixture::{Case, ConfigureBlock};

fn flat_options() -> Value {
    json!({"rich_content": false, "strict_role_orders": true})
}

fn direct(case_id: &str, settings: Value, message_options: Value, prompt_data: Value) -> Case {
    Case {
        case_id: case_id.to_string(),
        mode: "direct".to_string(),
        settings,
        message_options,
        prompt_data: Some(prompt_data),
        configure: None,
    }
}

fn configure(case_id: &str, block: ConfigureBlock) -> Case {
    Case {
        case_id: case_id.to_string(),
        mode: "configure".to_string(),
        settings: json!({}),
        message_options: flat_options(),
        prompt_data: None,
        configure: Some(block),
    }
}

fn roundtrip(case_id: &str, mode: &str, prompt_data: Value) -> Case {
    Case {
        case_id: case_id.to_string(),
        mode: mode.to_string(),
        settings: json!({}),
        message_options: flat_options(),
        prompt_data: Some(prompt_data),
        configure: None,
    }
}

/// All catalog cases, in generation order.
#[must_use]
pub fn cases() -> Vec<Case> {
    vec![
        direct(
            "prompt_001_empty_prompt_error",
            json!({}),
            flat_options(),
            json!({".agent": {}, ".request": {}}),
        ),
        direct(
            "prompt_002_input_only",
            json!({}),
            flat_options(),
            json!({".agent": {}, ".request": {"input": "hello"}}),
        ),
        direct(
            "prompt_003_full_slots_with_json_output",
            json!({}),
            flat_options(),
            json!({
                ".agent": {
                    "developer": "developer directions",
                    "system": "system role",
                },
                ".request": {
                    "examples": ["ex1", "ex2"],
                    "info": {"a": "A", "b": "B"},
                    "input": "ask",
                    "instruct": ["do-1", "do-2"],
                    "output": {
                        "answer": {"$desc": "final answer", "$type": "str"},
                        "steps": [{"$desc": "one step", "$type": "str"}],
                    },
                },
            }),
        ),
        direct(
            "prompt_004_output_format_markdown_manual",
            json!({}),
            flat_options(),
            json!({
                ".agent": {},
                ".request": {
                    "input": "say hi",
                    "output": {"answer": {"$type": "str"}},
                    "output_format": "markdown",
                },
            }),
        ),
        direct(
            "prompt_005_output_format_text_manual",
            json!({}),
            flat_options(),
            json!({
                ".agent": {},
                ".request": {
                    "input": "say hi",
                    "output": {"answer": {"$type": "str"}},
                    "output_format": "text",
                },
            }),
        ),
        direct(
            "prompt_006_role_mapping_override",
            json!({
                "prompt.role_mapping": {
                    "_": "assistant",
                    "assistant": "assistant",
                    "developer": "developer",
                    "system": "system",
                    "user": "user",
                },
            }),
            json!({
                "rich_content": false,
                "role_mapping": {"assistant": "assistant", "user": "user"},
                "strict_role_orders": true,
            }),
            json!({
                ".agent": {"system": "You are mapped"},
                ".request": {"input": "hello"},
            }),
        ),
        direct(
            "prompt_007_prompt_title_mapping_override",
            json!({
                "prompt.prompt_title_mapping": {
                    "action_results": "ACTION RESULTS",
                    "chat_history": "CHAT HISTORY",
                    "developer": "DEVELOPER",
                    "examples": "EXAMPLES",
                    "info": "INFO",
                    "input": "INPUT",
                    "instruct": "INSTRUCTION",
                    "output": "OUTPUT",
                    "output_requirement": "OUTPUT REQUIREMENT",
                    "system": "SYSTEM ROLE",
                    "tools": "TOOLS",
                },
            }),
            flat_options(),
            json!({
                ".agent": {"system": "sys"},
                ".request": {"input": "hello", "output": {"answer": {"$type": "str"}}},
            }),
        ),
        direct(
            "prompt_008_chat_history_strict_false",
            json!({}),
            json!({"rich_content": false, "strict_role_orders": false}),
            json!({
                ".agent": {},
                ".request": {
                    "chat_history": [
                        {"content": "A1", "role": "assistant"},
                        {"content": "A2", "role": "assistant"},
                        {"content": "U1", "role": "user"},
                    ],
                    "input": "Q",
                },
            }),
        ),
        direct(
            "prompt_009_chat_history_strict_true",
            json!({}),
            flat_options(),
            json!({
                ".agent": {},
                ".request": {
                    "chat_history": [
                        {"content": "A1", "role": "assistant"},
                        {"content": "A2", "role": "assistant"},
                        {"content": "U1", "role": "user"},
                    ],
                    "input": "Q",
                },
            }),
        ),
        direct(
            "prompt_010_chat_history_rich_content",
            json!({}),
            json!({"rich_content": true, "strict_role_orders": true}),
            json!({
                ".agent": {},
                ".request": {
                    "chat_history": [
                        {
                            "content": [
                                {"text": "hello", "type": "text"},
                                {"image_url": {"url": "http://img"}, "type": "image_url"},
                            ],
                            "role": "assistant",
                        },
                        {"content": [{"text": "question", "type": "text"}], "role": "user"},
                    ],
                    "input": "continue",
                },
            }),
        ),
        direct(
            "prompt_011_attachment_only_rich_false",
            json!({}),
            flat_options(),
            json!({
                ".agent": {},
                ".request": {
                    "attachment": [
                        {"text": "text-a", "type": "text"},
                        {"image_url": {"url": "http://img"}, "type": "image_url"},
                    ],
                },
            }),
        ),
        direct(
            "prompt_012_attachment_only_rich_true",
            json!({}),
            json!({"rich_content": true, "strict_role_orders": true}),
            json!({
                ".agent": {},
                ".request": {
                    "attachment": [
                        {"text": "text-a", "type": "text"},
                        {"image_url": {"url": "http://img"}, "type": "image_url"},
                    ],
                },
            }),
        ),
        configure(
            "configure_013_yaml_basic_mappings",
            ConfigureBlock {
                content: ".agent:\n  system: You are ${role}\n.request:\n  input: Ask ${topic}\n$persona: ${persona}\n${request_key}: ${request_value}".to_string(),
                format: "yaml".to_string(),
                mappings: json!({
                    "persona": "teacher",
                    "request_key": "note",
                    "request_value": "from-yaml",
                    "role": "assistant",
                    "topic": "recursion",
                }),
                prompt_key_path: String::new(),
            },
        ),
        configure(
            "configure_014_json_prompt_key_path",
            ConfigureBlock {
                content: "{\"p1\": {\".request\": {\"input\": \"wrong\"}}, \"p2\": {\".agent\": {\"system\": \"SYS ${name}\"}, \".request\": {\"input\": \"IN ${topic}\", \"output\": {\"reply\": {\"$type\": \"str\"}}}}}".to_string(),
                format: "json".to_string(),
                mappings: json!({"name": "N1", "topic": "T1"}),
                prompt_key_path: "p2".to_string(),
            },
        ),
        configure(
            "configure_015_output_type_desc_conversion",
            ConfigureBlock {
                content: ".request:\n  input: test\n  output:\n    answer:\n      $type: str\n      $desc: final answer\n    extra:\n      .type:\n        detail:\n          $type: str\n      .desc: extra block".to_string(),
                format: "yaml".to_string(),
                mappings: json!({}),
                prompt_key_path: String::new(),
            },
        ),
        configure(
            "configure_016_alias_set_request_prompt",
            ConfigureBlock {
                content: ".alias:\n  set_request_prompt:\n    .args:\n      - instruct\n      - Reply politely.\n.request:\n  input: hi".to_string(),
                format: "yaml".to_string(),
                mappings: json!({}),
                prompt_key_path: String::new(),
            },
        ),
        roundtrip(
            "configure_017_roundtrip_yaml",
            "configure_roundtrip_yaml",
            json!({
                ".agent": {"system": "SYS"},
                ".request": {"input": "IN", "output": {"answer": {"$type": "str"}}},
            }),
        ),
        roundtrip(
            "configure_018_roundtrip_json",
            "configure_roundtrip_json",
            json!({
                ".agent": {"system": "SYS"},
                ".request": {"input": "IN", "output": {"answer": {"$type": "str"}}},
            }),
        ),
        configure(
            "configure_019_extra_field_order_preserved",
            ConfigureBlock {
                content: "$persona: mentor\n$style: concise\ngoal: parity\nhint: keep-order\n.request:\n  input: check order".to_string(),
                format: "yaml".to_string(),
                mappings: json!({}),
                prompt_key_path: String::new(),
            },
        ),
    ]
}
