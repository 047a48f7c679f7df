//! End-to-end runs of the `forge` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn forge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_forge"))
        .args(args)
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("FORGE_CONFIG")
        .env("FORGE_OFFLINE", "true")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run forge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_page(dir: &Path) {
    fs::write(dir.join("index.html"), "<html><body><h1>X</h1></body></html>").unwrap();
    fs::write(dir.join("style.css"), "h1 { color: red; }").unwrap();
    fs::write(dir.join("script.js"), "").unwrap();
}

#[test]
fn test_classify() {
    let output = forge(&["classify", "--brief", "Add dark mode and search"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "dark-mode");

    let output = forge(&["classify", "--brief", "add a chart", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["strategy"], "charts");
    assert_eq!(report["supported"], false);
}

#[test]
fn test_generate_offline() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("calc");

    let output = forge(&[
        "generate",
        "--brief",
        "Build a calculator",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("fallback"));

    let markup = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(markup.contains(r#"id="display""#));
    assert!(out.join("style.css").is_file());
    assert!(out.join("script.js").is_file());
}

#[test]
fn test_revise_in_place() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path());

    let output = forge(&[
        "revise",
        "--dir",
        dir.path().to_str().unwrap(),
        "--brief",
        "add dark mode",
    ]);
    assert!(output.status.success());

    let markup = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(markup.starts_with("<html><body>\n"));
    assert!(markup.contains("darkModeToggle"));
    let css = fs::read_to_string(dir.path().join("style.css")).unwrap();
    assert!(css.starts_with("h1 { color: red; }"));
    assert!(css.contains(".dark-mode"));
}

#[test]
fn test_revise_to_output_with_json() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path());
    let out = dir.path().join("revised");

    let output = forge(&[
        "revise",
        "--dir",
        dir.path().to_str().unwrap(),
        "--brief",
        "let users bookmark items",
        "--output",
        out.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["strategy"], "favorites");
    assert_eq!(report["status"]["status"], "applied");
    assert_eq!(report["changed"], true);

    // Source directory is untouched.
    let original = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert_eq!(original, "<html><body><h1>X</h1></body></html>");
    assert!(fs::read_to_string(out.join("index.html"))
        .unwrap()
        .contains("favorites"));
}

#[test]
fn test_revise_forced_strategy() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path());

    let output = forge(&[
        "revise",
        "--dir",
        dir.path().to_str().unwrap(),
        "--brief",
        "whatever",
        "--strategy",
        "search",
    ]);
    assert!(output.status.success());
    let markup = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(markup.contains("searchInput"));
}

#[test]
fn test_unknown_strategy_is_invalid_args() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path());

    let output = forge(&[
        "revise",
        "--dir",
        dir.path().to_str().unwrap(),
        "--brief",
        "x",
        "--strategy",
        "sparkles",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected one of"));

    // Nothing was written.
    let markup = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert_eq!(markup, "<html><body><h1>X</h1></body></html>");
}

#[test]
fn test_revise_empty_dir_generates() {
    let dir = TempDir::new().unwrap();

    let output = forge(&[
        "revise",
        "--dir",
        dir.path().to_str().unwrap(),
        "--brief",
        "a simple counter",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("generated"));
    let markup = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(markup.contains(r#"id="increment""#));
}

#[test]
fn test_serve_print_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pageforge.yaml");
    fs::write(&path, "delivery:\n  max_attempts: 2\n").unwrap();

    let output = forge(&[
        "serve",
        "--config",
        path.to_str().unwrap(),
        "--bind",
        "127.0.0.1:9100",
        "--print-config",
    ]);
    assert!(output.status.success());
    let yaml = stdout(&output);
    assert!(yaml.contains("127.0.0.1:9100"));
    assert!(yaml.contains("max_attempts: 2"));
}

#[test]
fn test_serve_bad_bind_is_invalid_args() {
    let output = forge(&["serve", "--bind", "not-an-address", "--print-config"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_subcommand_fails() {
    let output = forge(&[]);
    assert!(!output.status.success());
}
