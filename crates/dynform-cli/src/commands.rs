//! Command definitions and execution

use clap::{Parser, Subcommand};
use dynform_core::{Schema, Submission, Validator};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CliError;
use crate::output::{CheckOutput, InspectOutput, OutputFormat, ValidationOutput};
use crate::ExitCode;

/// Check form schemas and validate submissions against them
#[derive(Parser, Debug)]
#[command(name = "dynform")]
#[command(about = "Dynamic form schema checker and submission validator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print nothing; report through the exit code only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a schema and summarise it
    Check {
        /// Schema definition (.json, .yaml or .yml)
        #[arg(short, long)]
        schema: PathBuf,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate a submission file against a schema
    ///
    /// The data file holds either a bare field map or a full
    /// `{formId, data}` submission.
    Validate {
        #[arg(short, long)]
        schema: PathBuf,

        /// Submission data (.json, .yaml or .yml)
        #[arg(short, long)]
        data: PathBuf,

        /// Form identifier, overriding any formId in the data file
        #[arg(long)]
        form_id: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the category and parameter tree of a schema
    Inspect {
        #[arg(short, long)]
        schema: PathBuf,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

pub fn execute_check(
    schema: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let loaded = load_schema(schema)?;
    CheckOutput::new(schema, &loaded).render(format, out)?;
    Ok(ExitCode::Success)
}

pub fn execute_validate(
    schema: &Path,
    data: &Path,
    form_id: Option<String>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let loaded = load_schema(schema)?;
    let mut submission = load_submission(data)?;
    if let Some(id) = form_id {
        submission.form_id = Some(id);
    }

    let mut validator = Validator::new(&loaded);
    if let Some(id) = submission.form_id.as_deref() {
        validator = validator.with_form_id(id);
    }
    let report = validator.run(&submission);

    let output = ValidationOutput::from_report(submission.form_id.clone(), &report);
    output.render(format, out)?;

    Ok(ExitCode::from_validation_result(!report.result.valid))
}

pub fn execute_inspect(
    schema: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let loaded = load_schema(schema)?;
    InspectOutput::new(&loaded).render(format, out)?;
    Ok(ExitCode::Success)
}

/// Read and construct a schema, choosing the parser by file extension
pub fn load_schema(path: &Path) -> Result<Schema, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::file(path, e))?;
    let schema = match FileKind::of(path)? {
        FileKind::Json => Schema::from_json_str(&content)?,
        FileKind::Yaml => Schema::from_yaml_str(&content)?,
    };
    tracing::debug!(
        path = %path.display(),
        parameters = schema.parameter_count(),
        "Loaded schema"
    );
    Ok(schema)
}

/// Read a submission file
///
/// An object with an object-valued `data` key is read as a full submission;
/// any other object is taken as the field map itself.
pub fn load_submission(path: &Path) -> Result<Submission, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::file(path, e))?;
    let value: Value = match FileKind::of(path)? {
        FileKind::Json => serde_json::from_str(&content).map_err(|e| CliError::parse(path, e))?,
        FileKind::Yaml => serde_yaml::from_str(&content).map_err(|e| CliError::parse(path, e))?,
    };

    match value {
        Value::Object(map) if map.get("data").is_some_and(Value::is_object) => {
            serde_json::from_value(Value::Object(map)).map_err(|e| CliError::parse(path, e))
        }
        Value::Object(map) => Ok(Submission::new(map)),
        other => Err(CliError::invalid_input(format!(
            "submission in '{}' must be an object, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

enum FileKind {
    Json,
    Yaml,
}

impl FileKind {
    fn of(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(FileKind::Json),
            "yaml" | "yml" => Ok(FileKind::Yaml),
            other => Err(CliError::invalid_input(format!(
                "unsupported file extension '{}' for '{}' (expected json, yaml or yml)",
                other,
                path.display()
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
