use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::process::Command;

/// JSON-lines inputs, JSON output, and a config layer renaming the render glyphs.
#[test]
fn cli_merge_jsonl_inputs_with_config_to_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = dir.path().join("server.jsonl");
    let client = dir.path().join("client.jsonl");
    let config = dir.path().join("probe.yaml");
    fs::write(
        &server,
        r#"{"Protocol Number": 6, "Time (μs) (Server)": 150, "Source IP (Server)": "127.0.0.1"}
"#,
    )?;
    fs::write(
        &client,
        r#"{"Protocol Number": 6, "Time (μs) (Client)": 100}
{"Protocol Number": 17, "Time (μs) (Client)": null}
"#,
    )?;
    fs::write(&config, "render:\n  received: \"yes\"\n  unreceived: \"no\"\n")?;

    let out = Command::cargo_bin("protoprobe")?
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .arg("merge")
        .arg(&server)
        .arg(&client)
        .arg("--config")
        .arg(&config)
        .args(["--format", "json"])
        .output()?;
    assert!(out.status.success());

    let v: Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(
        v["columns"],
        json!([
            "Protocol Number",
            "Source IP (Server)",
            "Received (Server)",
            "Time difference (μs)"
        ])
    );
    assert_eq!(v["rows"][0], json!([6, "127.0.0.1", true, 50]));
    assert_eq!(v["rows"][1], json!([17, null, false, "unknown"]));
    Ok(())
}

/// Config glyph overrides flow into the table output.
#[test]
fn cli_merge_table_uses_configured_glyphs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = dir.path().join("server.md");
    let client = dir.path().join("client.md");
    let config = dir.path().join("probe.yaml");
    fs::write(&server, "| Protocol Number | Time (μs) (Server) |\n|---|---|\n| 6 | 9 |\n")?;
    fs::write(&client, "| Protocol Number | Time (μs) (Client) |\n|---|---|\n| 17 | 1 |\n")?;
    fs::write(&config, "render:\n  received: \"yes\"\n  unreceived: \"no\"\n")?;

    let mut cmd = Command::cargo_bin("protoprobe")?;
    cmd.env("RUST_LOG", "off")
        .arg("merge")
        .arg(&server)
        .arg(&client)
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("| yes "))
        .stdout(predicate::str::contains("| no "));
    Ok(())
}

/// `config-hash` prints the hash line then the canonical JSON.
#[test]
fn cli_config_hash_prints_hash_and_canonical_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("probe.yaml");
    fs::write(&config, "render:\n  unreceived: \"no\"\n  received: \"yes\"\n")?;

    let mut cmd = Command::cargo_bin("protoprobe")?;
    cmd.env("RUST_LOG", "off").arg("config-hash").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match("^config_hash=[0-9a-f]{64}\n")?)
        .stdout(predicate::str::contains(
            r#"{"render":{"received":"yes","unreceived":"no"}}"#,
        ));
    Ok(())
}
