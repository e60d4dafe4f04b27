//! Parameters, categories and their extension metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::content::{nullable, Content};

/// UI input kind tag for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    List,
    SubList,
    TextField,
    NumberField,
    DateField,
    DatetimeField,
    TimeField,
    Range,
    Checkbox,
    Radio,
    MultiSelect,
    Textarea,
    FileUpload,
    ColorPicker,
    Switch,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::List => "list",
            InputKind::SubList => "sub_list",
            InputKind::TextField => "text_field",
            InputKind::NumberField => "number_field",
            InputKind::DateField => "date_field",
            InputKind::DatetimeField => "datetime_field",
            InputKind::TimeField => "time_field",
            InputKind::Range => "range",
            InputKind::Checkbox => "checkbox",
            InputKind::Radio => "radio",
            InputKind::MultiSelect => "multi_select",
            InputKind::Textarea => "textarea",
            InputKind::FileUpload => "file_upload",
            InputKind::ColorPicker => "color_picker",
            InputKind::Switch => "switch",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule declared for clients and remote validators
///
/// Stored and returned unchanged. The engine never evaluates these; an
/// `endpoint` in particular is never called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredRule {
    pub rule: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(rename = "async", default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Opaque visibility expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityCondition {
    pub condition: String,
}

/// Rendering hints passed through to clients
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_strength_meter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
}

/// The `x-*` extension block of a parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(
        rename = "x-validation",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validation_rules: Vec<DeclaredRule>,
    #[serde(
        rename = "x-visibility",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility_condition: Option<VisibilityCondition>,
    #[serde(rename = "x-ui-hints", default, skip_serializing_if = "Option::is_none")]
    pub ui_hints: Option<UiHints>,
    #[serde(
        rename = "x-error-messages",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub error_message_overrides: BTreeMap<String, String>,
}

impl Extensions {
    pub fn is_empty(&self) -> bool {
        self.validation_rules.is_empty()
            && self.visibility_condition.is_none()
            && self.ui_hints.is_none()
            && self.error_message_overrides.is_empty()
    }
}

/// One form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Unique key across the whole schema
    pub name: String,
    #[serde(rename = "type")]
    pub input_kind: InputKind,
    /// Human-readable label, also used in error messages
    pub description: String,
    pub required: bool,
    /// Parameters this one depends on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    pub content: Content,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        input_kind: InputKind,
        description: impl Into<String>,
        content: Content,
    ) -> Self {
        Self {
            name: name.into(),
            input_kind,
            description: description.into(),
            required: false,
            related: Vec::new(),
            content,
            extensions: Extensions::default(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related = related.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Whether `name` is snake_case starting with a lowercase letter
pub fn is_valid_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// A named group of parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: Vec<Parameter>,
}

impl Category {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
