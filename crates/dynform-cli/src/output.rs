//! Output rendering for the dynform CLI
//!
//! Every command result renders as a colored table for people, or as JSON
//! or YAML for scripts.

use clap::ValueEnum;
use colored::Colorize;
use dynform_core::{Content, Schema, ValidationError, ValidationReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::CliError;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table with colors
    #[default]
    Table,
    Json,
    Yaml,
}

fn render_structured<T: Serialize>(
    value: &T,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<bool, CliError> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Table => return Ok(false),
    };
    writeln!(out, "{}", text.trim_end()).ok();
    Ok(true)
}

fn heading(out: &mut dyn Write, title: &str) {
    writeln!(out).ok();
    writeln!(out, "{}", title.cyan().bold()).ok();
    writeln!(out, "{}", "=".repeat(60)).ok();
}

/// Summary printed by `check`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub schema: String,
    pub categories: usize,
    pub parameters: usize,
    pub required: usize,
    /// Parameter count per content type tag
    pub content_types: BTreeMap<String, usize>,
}

impl CheckOutput {
    pub fn new(path: &Path, schema: &Schema) -> Self {
        let mut content_types = BTreeMap::new();
        for param in schema.parameters() {
            *content_types
                .entry(param.content.type_tag().to_string())
                .or_insert(0) += 1;
        }

        Self {
            schema: path.display().to_string(),
            categories: schema.categories().len(),
            parameters: schema.parameter_count(),
            required: schema.parameters().filter(|p| p.required).count(),
            content_types,
        }
    }

    pub fn render(&self, format: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
        if render_structured(self, format, out)? {
            return Ok(());
        }

        heading(out, "Schema Check");
        writeln!(out, "{} {} is a valid schema", "+".green(), self.schema).ok();
        writeln!(out).ok();
        writeln!(out, "  Categories: {}", self.categories).ok();
        writeln!(out, "  Parameters: {}", self.parameters).ok();
        writeln!(out, "  Required:   {}", self.required).ok();
        if !self.content_types.is_empty() {
            writeln!(out).ok();
            writeln!(out, "{}", "Content types:".cyan().bold()).ok();
            for (tag, count) in &self.content_types {
                writeln!(out, "  {:<16} {}", tag, count).ok();
            }
        }
        Ok(())
    }
}

/// Result printed by `validate`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    pub valid: bool,
    pub error_count: usize,
    pub errors: Vec<ValidationError>,
    pub summary: String,
    pub parameters_checked: usize,
    pub parameters_failed: usize,
    pub duration_us: u64,
}

impl ValidationOutput {
    pub fn from_report(form_id: Option<String>, report: &ValidationReport) -> Self {
        let error_count = report.result.errors.len();
        let summary = if report.result.valid {
            "Submission is valid".to_string()
        } else {
            format!(
                "Submission has {} error(s) in {} field(s)",
                error_count, report.parameters_failed
            )
        };

        Self {
            form_id,
            valid: report.result.valid,
            error_count,
            errors: report.result.errors.clone(),
            summary,
            parameters_checked: report.parameters_checked,
            parameters_failed: report.parameters_failed,
            duration_us: report.duration_us,
        }
    }

    pub fn render(&self, format: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
        if render_structured(self, format, out)? {
            return Ok(());
        }

        heading(out, "Validation Results");
        if let Some(id) = &self.form_id {
            writeln!(out, "Form: {}", id.bold()).ok();
        }
        let status = if self.valid { "+".green() } else { "x".red() };
        writeln!(out, "{} {}", status, self.summary).ok();

        if !self.errors.is_empty() {
            writeln!(out).ok();
            writeln!(out, "{}", "Errors:".cyan().bold()).ok();
            writeln!(out, "{}", "-".repeat(60)).ok();
            for error in &self.errors {
                writeln!(
                    out,
                    "{} [{}] {} {}",
                    "x".red(),
                    error.code.as_str().dimmed(),
                    error.field.cyan(),
                    error.message
                )
                .ok();
            }
        }

        writeln!(out).ok();
        writeln!(
            out,
            "Checked {} parameter(s) in {} us",
            self.parameters_checked,
            self.duration_us.to_string().dimmed()
        )
        .ok();
        Ok(())
    }
}

/// Parameter tree printed by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    pub categories: Vec<CategoryOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOutput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: Vec<ParameterOutput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOutput {
    pub name: String,
    pub input: String,
    pub content: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    /// Human-readable constraints the engine enforces
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

impl InspectOutput {
    pub fn new(schema: &Schema) -> Self {
        let categories = schema
            .categories()
            .iter()
            .map(|category| CategoryOutput {
                name: category.name.clone(),
                description: category.description.clone(),
                params: category
                    .params
                    .iter()
                    .map(|param| ParameterOutput {
                        name: param.name.clone(),
                        input: param.input_kind.to_string(),
                        content: param.content.type_tag().to_string(),
                        description: param.description.clone(),
                        required: param.required,
                        related: param.related.clone(),
                        constraints: constraints(&param.content),
                    })
                    .collect(),
            })
            .collect();

        Self { categories }
    }

    pub fn render(&self, format: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
        if render_structured(self, format, out)? {
            return Ok(());
        }

        heading(out, "Schema Structure");
        for category in &self.categories {
            writeln!(out).ok();
            match &category.description {
                Some(description) => {
                    writeln!(out, "{} ({})", category.name.bold(), description).ok()
                }
                None => writeln!(out, "{}", category.name.bold()).ok(),
            };
            for param in &category.params {
                let marker = if param.required {
                    "*".red()
                } else {
                    " ".normal()
                };
                writeln!(
                    out,
                    "  {}{:<24} {:<14} {:<16} {}",
                    marker,
                    param.name,
                    param.input,
                    param.content,
                    param.description.dimmed()
                )
                .ok();
                if !param.related.is_empty() {
                    writeln!(out, "      depends on: {}", param.related.join(", ")).ok();
                }
                for constraint in &param.constraints {
                    writeln!(out, "      {}", constraint).ok();
                }
            }
        }
        Ok(())
    }
}

fn constraints(content: &Content) -> Vec<String> {
    let mut found = Vec::new();
    match content {
        Content::String(s) => {
            if let Some(n) = s.min_length.filter(|&n| n > 0) {
                found.push(format!("minLength {}", n));
            }
            if let Some(pattern) = &s.pattern {
                found.push(format!("pattern {}", pattern));
            }
        }
        Content::Number(n) => {
            if let Some(min) = n.min {
                found.push(format!("min {}", min));
            }
            if let Some(max) = n.max {
                found.push(format!("max {}", max));
            }
        }
        _ => {}
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_core::Validator;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::from_value(json!({
            "paramCategories": [{
                "name": "order",
                "description": "Order",
                "params": [
                    {
                        "name": "code",
                        "type": "text_field",
                        "description": "Code",
                        "required": true,
                        "content": {"type": "string", "minLength": 3, "pattern": "[A-Z]+"}
                    },
                    {
                        "name": "quantity",
                        "type": "number_field",
                        "description": "Quantity",
                        "content": {"type": "integer", "min": 1, "max": 10}
                    }
                ]
            }]
        }))
        .unwrap()
    }

    fn render_json<F>(render: F) -> serde_json::Value
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), CliError>,
    {
        let mut buf = Vec::new();
        render(&mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_check_counts() {
        let schema = schema();
        let output = CheckOutput::new(Path::new("order.json"), &schema);
        assert_eq!(output.parameters, 2);
        assert_eq!(output.required, 1);
        assert_eq!(output.content_types["string"], 1);
        assert_eq!(output.content_types["integer"], 1);

        let v = render_json(|buf| output.render(OutputFormat::Json, buf));
        assert_eq!(v["contentTypes"]["integer"], 1);
    }

    #[test]
    fn test_validation_output_json() {
        let schema = schema();
        let submission = dynform_core::Submission::from_data(json!({"code": "ab", "quantity": 20}));
        let report = Validator::new(&schema).run(&submission);
        let output = ValidationOutput::from_report(Some("order".into()), &report);

        assert_eq!(output.summary, "Submission has 3 error(s) in 2 field(s)");
        let v = render_json(|buf| output.render(OutputFormat::Json, buf));
        assert_eq!(v["formId"], "order");
        assert_eq!(v["valid"], false);
        assert_eq!(v["errors"][0]["code"], "minLength");
        assert_eq!(v["errors"][1]["code"], "pattern");
        assert_eq!(v["errors"][2]["message"], "Quantity must be at most 10.0");
    }

    #[test]
    fn test_inspect_constraints() {
        let output = InspectOutput::new(&schema());
        let params = &output.categories[0].params;
        assert_eq!(params[0].constraints, vec!["minLength 3", "pattern [A-Z]+"]);
        assert_eq!(params[1].constraints, vec!["min 1", "max 10"]);
        assert_eq!(params[1].input, "number_field");

        let mut buf = Vec::new();
        output.render(OutputFormat::Yaml, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("name: quantity"));
    }

    #[test]
    fn test_table_mentions_messages() {
        let schema = schema();
        let submission = dynform_core::Submission::from_data(json!({}));
        let report = Validator::new(&schema).run(&submission);
        let output = ValidationOutput::from_report(None, &report);

        let mut buf = Vec::new();
        output.render(OutputFormat::Table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Code is required"));
        assert!(text.contains("Submission has 1 error(s) in 1 field(s)"));
    }
}
