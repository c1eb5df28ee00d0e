//! Integration tests for `tspaths resolve` and `tspaths config`.
//!
//! Each test builds a small project in a temp dir and drives the binary
//! against it.

use serial_test::serial;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "tspaths-cli", "--bin", "tspaths", "--"]);
    cmd.env_remove("TS_NODE_PROJECT");
    cmd.env_remove("TS_NODE_BASEURL");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with `@app/*` and `@shared` mappings under `baseUrl: ./src`.
fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("tsconfig.json"),
        r#"{
            // path aliases
            "compilerOptions": {
                "baseUrl": "./src",
                "paths": {
                    "@app/*": ["app/*"],
                    "@shared": ["shared/index.ts"],
                },
            },
        }"#,
    );
    write(&root.join("src").join("app").join("server.ts"), "export {}");
    write(&root.join("src").join("app").join("routes").join("index.tsx"), "export {}");
    write(&root.join("src").join("shared").join("index.ts"), "export {}");
    write(&root.join("src").join("plain.js"), "");
    dir
}

fn run_json(cwd: &Path, args: &[&str]) -> (Output, serde_json::Value) {
    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(cwd)
        .args(args)
        .output()
        .expect("Failed to run tspaths");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout should be valid JSON ({e}): {stdout}"));
    (output, json)
}

fn resolved_of<'a>(json: &'a serde_json::Value, specifier: &str) -> &'a serde_json::Value {
    json["results"]
        .as_array()
        .expect("results should be an array")
        .iter()
        .find(|r| r["specifier"] == specifier)
        .map(|r| &r["resolved"])
        .unwrap_or_else(|| panic!("no result for {specifier}"))
}

#[test]
#[serial]
fn test_resolve_json_shape_and_results() {
    let dir = project();
    let root = dir.path();
    let (output, json) = run_json(root, &["resolve", "@app/server", "@app/routes", "@shared", "plain", "react", "./local"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert_eq!(
        json["config_file"].as_str(),
        Some(root.join("tsconfig.json").to_string_lossy().as_ref())
    );
    assert_eq!(
        json["absolute_base_url"].as_str(),
        Some(root.join("src").to_string_lossy().as_ref())
    );

    let src = root.join("src");
    assert_eq!(
        resolved_of(&json, "@app/server").as_str(),
        Some(src.join("app").join("server").to_string_lossy().as_ref())
    );
    assert_eq!(
        resolved_of(&json, "@app/routes").as_str(),
        Some(src.join("app").join("routes").to_string_lossy().as_ref())
    );
    // an exact file target is returned as written
    assert_eq!(
        resolved_of(&json, "@shared").as_str(),
        Some(src.join("shared").join("index.ts").to_string_lossy().as_ref())
    );
    // baseUrl catch-all
    assert_eq!(
        resolved_of(&json, "plain").as_str(),
        Some(src.join("plain").to_string_lossy().as_ref())
    );
    assert!(resolved_of(&json, "react").is_null());
    assert!(resolved_of(&json, "./local").is_null());
}

#[test]
#[serial]
fn test_resolve_async_matches_sync() {
    let dir = project();
    let specs = ["resolve", "@app/server", "@app/routes", "@shared", "missing"];
    let (_, sync) = run_json(dir.path(), &specs);

    let mut async_args = specs.to_vec();
    async_args.push("--async");
    let (output, async_) = run_json(dir.path(), &async_args);

    assert!(output.status.success());
    assert_eq!(sync["results"], async_["results"]);
}

#[test]
#[serial]
fn test_resolve_with_ext_flag() {
    let dir = project();
    let (_, json) = run_json(dir.path(), &["resolve", "@app/server", "--ext", ".js"]);
    assert!(resolved_of(&json, "@app/server").is_null());
}

#[test]
#[serial]
fn test_resolve_human_output() {
    let dir = project();
    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["resolve", "@app/server", "nope"])
        .output()
        .expect("Failed to run tspaths");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("@app/server -> "), "stdout: {stdout}");
    assert!(stdout.contains("nope: not found"), "stdout: {stdout}");
}

#[test]
#[serial]
fn test_resolve_without_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(&empty)
        .args(["resolve", "--project", "."])
        .arg("@app/x")
        .output()
        .expect("Failed to run tspaths");

    assert!(!output.status.success());
}

#[test]
#[serial]
fn test_resolve_relative_to_parent() {
    let dir = project();
    let root = dir.path();
    write(&root.join("node_modules").join("react").join("package.json"), "{}");
    write(&root.join("src").join("react.ts"), "export {}");

    let args = [
        "resolve",
        "--parent",
        "src/app/routes/index.tsx",
        "--relative",
        "@app/server",
        "@shared",
        "react",
        "missing",
    ];
    let (output, json) = run_json(root, &args);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(resolved_of(&json, "@app/server").as_str(), Some("../server"));
    assert_eq!(resolved_of(&json, "@shared").as_str(), Some("../../shared/index.ts"));
    // the installed package wins over the baseUrl catch-all
    assert!(resolved_of(&json, "react").is_null());
    assert!(resolved_of(&json, "missing").is_null());

    let mut async_args = args.to_vec();
    async_args.push("--async");
    let (_, async_) = run_json(root, &async_args);
    assert_eq!(json["results"], async_["results"]);
}

#[test]
#[serial]
fn test_relative_requires_parent() {
    let dir = project();
    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["resolve", "--relative", "@app/server"])
        .output()
        .expect("Failed to run tspaths");

    assert!(!output.status.success());
}

#[test]
#[serial]
fn test_config_json() {
    let dir = project();
    let (output, json) = run_json(dir.path(), &["config"]);

    assert!(output.status.success());
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert_eq!(json["base_url"].as_str(), Some("./src"));
    assert_eq!(json["add_match_all"].as_bool(), Some(true));

    let patterns: Vec<&str> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["pattern"].as_str().unwrap())
        .collect();
    // longest literal prefix first, synthesized catch-all last
    assert_eq!(patterns, vec!["@shared", "@app/*", "*"]);
}

#[test]
#[serial]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run tspaths");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert!(json["version"].as_str().is_some());
}
