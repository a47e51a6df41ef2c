use pp_config::{load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy};

/// scenario_unused_keys_warn_or_fail
///
/// 1) Unused keys are detected under Warn without erroring.
/// 2) Unused keys fail under Fail.
/// 3) Keys under consumed sections are not flagged.
/// 4) Unused pointers come back sorted.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
columns:
  key: "Proto"

output:
  colour: true
  width: 80
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/output/colour".to_string(), "/output/width".to_string()]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
render:
  received: "y"
colums:
  key: "typo"
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let result = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail);

    let msg = format!("{:?}", result.err().expect("fail policy must error"));
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
    assert!(msg.contains("/colums/key"));
}

#[test]
fn consumed_sections_cover_nested_keys() {
    let yaml = r#"
columns:
  key: "Proto"
  receiver_suffix: "_r"
markers:
  "-": absent
  "n/a": absent
render:
  absent: "."
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("fully consumed config must pass fail policy");
    assert!(report.is_clean());
    assert_eq!(
        report.consumed_prefixes,
        vec!["/columns", "/markers", "/render"]
    );
}

#[test]
fn deterministic_unused_pointer_ordering() {
    let yaml = r#"
unused:
  b: 2
  a: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/unused/a".to_string(), "/unused/b".to_string()]
    );
}
