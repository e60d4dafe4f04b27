use clap::Parser;
use dynform_cli::{run, Cli, CliError, ExitCode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REGISTRATION: &str = include_str!("../../dynform-api/schemas/user_registration.json");

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn invoke(args: &[&str]) -> (Result<ExitCode, CliError>, String) {
    let mut argv = vec!["dynform"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let result = run(cli, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn check_summarises_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user_registration.json", REGISTRATION);

    let (result, out) = invoke(&["check", "--schema", arg(&schema), "--format", "json"]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["categories"], 3);
    assert_eq!(v["parameters"], 10);
    assert_eq!(v["required"], 8);
    assert_eq!(v["contentTypes"]["string"], 6);
}

#[test]
fn check_rejects_duplicate_parameters() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "dup.yaml",
        r#"
paramCategories:
  - name: one
    params:
      - {name: email, type: text_field, description: Email, content: {type: string}}
  - name: two
    params:
      - {name: email, type: text_field, description: Email, content: {type: string}}
"#,
    );

    let (result, _) = invoke(&["check", "--schema", arg(&schema)]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::SchemaError);
    assert!(err.to_string().contains("email"));
}

#[test]
fn validate_valid_submission() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user_registration.json", REGISTRATION);
    let data = write(
        &dir,
        "signup.yaml",
        r#"
formId: user_registration
data:
  email: ada@example.com
  password: longenough1
  full_name: Ada Lovelace
  birth_date: "1990-12-10"
  country: GB
  postal_code: SW1A 1AA
  address_line1: 1 Example Street
  communication_method: email
"#,
    );

    let (result, out) = invoke(&[
        "validate",
        "--schema",
        arg(&schema),
        "--data",
        arg(&data),
        "--format",
        "json",
    ]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["valid"], true);
    assert_eq!(v["formId"], "user_registration");
    assert_eq!(v["errors"], serde_json::json!([]));
    assert_eq!(v["parametersChecked"], 10);
}

#[test]
fn validate_reports_errors_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user_registration.json", REGISTRATION);
    let data = write(
        &dir,
        "bare.json",
        r#"{"email": "nope", "password": "short", "full_name": "A"}"#,
    );

    let (result, out) = invoke(&[
        "validate",
        "--schema",
        arg(&schema),
        "--data",
        arg(&data),
        "--form-id",
        "signup",
        "--format",
        "json",
    ]);
    assert_eq!(result.unwrap(), ExitCode::ValidationError);

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["formId"], "signup");
    let fields: Vec<&str> = v["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec![
            "email",
            "password",
            "password",
            "full_name",
            "birth_date",
            "country",
            "postal_code",
            "address_line1",
            "communication_method",
        ]
    );
    assert_eq!(v["errors"][3]["message"], "Full Name must be at least 2 characters");
}

#[test]
fn quiet_suppresses_output() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "user_registration.json", REGISTRATION);
    let data = write(&dir, "empty.json", "{}");

    let (result, out) = invoke(&[
        "--quiet",
        "validate",
        "--schema",
        arg(&schema),
        "--data",
        arg(&data),
    ]);
    assert_eq!(result.unwrap(), ExitCode::ValidationError);
    assert!(out.is_empty());
}

#[test]
fn inspect_lists_dependencies() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "location.yml",
        r#"
paramCategories:
  - name: location
    description: Location
    params:
      - name: country
        type: list
        description: Country
        required: true
        content:
          type: enum
          values:
            - {label: United Kingdom, value: GB}
      - name: region
        type: list
        description: Region
        related: country
        content:
          type: dependent_enum
          dependsOn: country
          mapping:
            GB:
              - {label: England, value: england}
"#,
    );

    let (result, out) = invoke(&["inspect", "--schema", arg(&schema), "--format", "json"]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    let params = &v["categories"][0]["params"];
    assert_eq!(params[0]["name"], "country");
    assert_eq!(params[0]["required"], true);
    assert_eq!(params[1]["content"], "dependent_enum");
    assert_eq!(params[1]["related"], serde_json::json!(["country"]));
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let (result, _) = invoke(&["inspect", "--schema", arg(&missing)]);
    assert_eq!(result.unwrap_err().exit_code(), ExitCode::FileError);
}
