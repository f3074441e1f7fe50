// run the wirebind binary against a temporary protocol description
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;

/// Writes a description with one operation lacking a length expression
fn write_description(dir: &Path) -> std::path::PathBuf {
    let description = json!({
        "namespaces": [ { "name": "x", "prefix": "", "inject_methods": true } ],
        "requests": [
            {
                "name": "map_window", "namespace": "x", "void": true,
                "parameters": [ { "name": "window", "type": "xcb_window_t" } ]
            },
            {
                "name": "get_keyboard_mapping", "namespace": "x", "void": false,
                "parameters": [ { "name": "first_keycode", "type": "xcb_keycode_t" } ],
                "reply": { "fields": [ { "name": "keysyms", "type": "xcb_keysym_t", "list": true } ] }
            }
        ]
    });
    let path = dir.join("xproto.json");
    std::fs::write(&path, description.to_string()).unwrap();
    path
}

/// Writes the default config into `dir` through `init-config`
fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wirebind"));
    cmd.args(["init-config", "--path"]).arg(&path);
    cmd.assert().success().stdout(predicate::str::contains("wrote default configuration"));
    path
}

#[test]
fn init_config_refuses_existing_file() {
    let tmp = tempdir().unwrap();
    let path = write_config(tmp.path());
    assert!(path.exists());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wirebind"));
    cmd.args(["init-config", "--path"]).arg(&path);
    cmd.assert().failure().stderr(predicate::str::contains("already exists"));
}

#[test]
fn generate_fails_without_keep_going() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path());
    let input = write_description(tmp.path());
    let out = tmp.path().join("gen");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wirebind"));
    cmd.arg("generate").arg("--config").arg(&config).arg("--input").arg(&input);
    cmd.arg("--output").arg(&out);
    cmd.assert().failure().stderr(predicate::str::contains("1 operation(s) failed"));
    assert!(!out.join("x.hpp").exists());
}

#[test]
fn generate_keep_going_writes_headers() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path());
    let input = write_description(tmp.path());
    let out = tmp.path().join("gen");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wirebind"));
    cmd.arg("generate").arg("--config").arg(&config).arg("--input").arg(&input);
    cmd.arg("--output").arg(&out).arg("--keep-going");
    cmd.assert().success().stdout(predicate::str::contains("generated 1 operation(s)"));
    assert!(out.join("x.hpp").exists());
    assert!(out.join("x_window_methods.inc").exists());
}

#[test]
fn generate_rejects_unknown_log_level() {
    let tmp = tempdir().unwrap();
    let config = write_config(tmp.path());
    let input = write_description(tmp.path());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wirebind"));
    cmd.arg("generate").arg("--config").arg(&config).arg("--input").arg(&input);
    cmd.args(["--log-level", "chatty"]);
    cmd.assert().failure().stderr(predicate::str::contains("chatty"));
}
