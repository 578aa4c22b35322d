//! CLI integration tests
//!
//! These tests run the `csdl` binary against documents written to
//! temporary files.

#![cfg(feature = "cli")]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const VALID: &str = r#"<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Shop" Alias="S">
  <EntityType Name="Product">
    <Key><PropertyRef Name="Id"/></Key>
    <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
  </EntityType>
  <Function Name="Top"><ReturnType Type="Collection(S.Product)"/></Function>
  <EntityContainer Name="Catalog">
    <EntitySet Name="Products" EntityType="S.Product"/>
  </EntityContainer>
</Schema>"#;

const BROKEN: &str = r#"<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Shop">
  <EntityType Name="Product">
    <Property Name="Maker" Type="Shop.Maker"/>
    <Property Name="Maker" Type="Edm.String"/>
  </EntityType>
</Schema>"#;

fn document(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

fn run(args: &[&str], path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csdl"))
        .args(args)
        .arg(path)
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let file = document(VALID);
    let output = run(&["inspect"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("edm-csdl"), "should show version");
    assert!(stdout.contains("Namespace: Shop"), "should show namespace");
    assert!(stdout.contains("Alias: S"), "should show alias");
    assert!(stdout.contains("Schema Types: 1"), "should show type count");
    assert!(stdout.contains("Products : Shop.Product"), "should resolve entity set type");
    assert!(!stdout.contains("Diagnostics"), "valid document has no diagnostics");
}

#[test]
fn test_cli_inspect_json_output() {
    let file = document(VALID);
    let output = run(&["inspect", "--json"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect --json should succeed");

    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["model"]["namespace"], "Shop");
    assert_eq!(json["model"]["version"], "4.0");
    assert_eq!(json["model"]["types"][0]["name"], "Shop.Product");
    assert_eq!(json["model"]["operations"][0]["name"], "Shop.Top");
    assert_eq!(json["model"]["containers"][0]["entitySets"][0], "Products");
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_cli_inspect_json_ambiguous_operation() {
    let file = document(
        r#"<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Shop">
  <Function Name="F"><Parameter Name="x" Type="Edm.Int32"/><ReturnType Type="Edm.Int32"/></Function>
  <Function Name="F"><Parameter Name="x" Type="Edm.String"/><ReturnType Type="Edm.Int32"/></Function>
</Schema>"#,
    );
    let output = run(&["inspect", "--json"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let operations = json["model"]["operations"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["key"], "Shop.F");
    assert_eq!(operations[0]["ambiguous"], true);
    assert_eq!(operations[0]["candidates"], 2);
    assert_eq!(json["errors"][0]["code"], "BadAmbiguousElementBinding");
}

#[test]
fn test_cli_inspect_reports_diagnostics() {
    let file = document(BROKEN);
    let output = run(&["inspect"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "a model is still produced");
    assert!(stdout.contains("[bad members]"));
    assert!(stdout.contains("Diagnostics (2)"));
}

#[test]
fn test_cli_inspect_unreadable_document() {
    let file = document("<Schema xmlns=\"urn:nothing\"/>");
    let output = run(&["inspect"], file.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No model could be read"));
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn test_cli_check_valid() {
    let file = document(VALID);
    let output = run(&["check"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "check should succeed on a valid document");
    assert!(stdout.contains("is valid"));
}

#[test]
fn test_cli_check_invalid() {
    let file = document(BROKEN);
    let output = run(&["check"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("2 diagnostic(s)"));
    assert!(stdout.contains("Shop.Maker"));
}

#[test]
fn test_cli_missing_file() {
    let output = run(&["check"], Path::new("/nonexistent/schema.csdl"));

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

// ============================================================================
// Help Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_csdl"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("check"));
}
