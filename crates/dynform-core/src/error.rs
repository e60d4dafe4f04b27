//! Error types for schema construction
//!
//! Construction errors are raised once, when a form definition is turned
//! into a [`Schema`](crate::Schema). Submission problems are never errors in
//! this sense; they are reported as data in a
//! [`ValidationResult`](crate::ValidationResult).

use thiserror::Error;

/// Reasons a form definition is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The raw definition does not have the shape of a schema at all
    #[error("Malformed schema definition: {0}")]
    Malformed(String),

    /// A content block carries a `type` tag that is not a known content kind
    #[error("Parameter '{param}' has unknown content type '{tag}'")]
    ContentType { param: String, tag: String },

    /// A content block has a known tag but an invalid body
    #[error("Parameter '{param}' has invalid content: {reason}")]
    InvalidContent { param: String, reason: String },

    /// A parameter name is not snake_case starting with a letter
    #[error("Parameter name '{0}' must match ^[a-z][a-z0-9_]*$")]
    InvalidParameterName(String),

    /// A string pattern does not compile
    #[error("Parameter '{param}' has invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        param: String,
        pattern: String,
        reason: String,
    },

    /// Two categories share a name
    #[error("Category name '{0}' is duplicated")]
    DuplicateCategoryName(String),

    /// Two parameters anywhere in the schema share a name
    #[error("Parameter name '{0}' is duplicated")]
    DuplicateParameterName(String),

    /// A `related` entry names a parameter that does not exist
    #[error("Parameter '{param}' references non-existent parent '{missing}'")]
    DanglingDependency { param: String, missing: String },
}

impl SchemaError {
    /// Create a malformed-definition error
    pub fn malformed(msg: impl Into<String>) -> Self {
        SchemaError::Malformed(msg.into())
    }

    /// Create an invalid-content error for a parameter
    pub fn invalid_content(param: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidContent {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable identifier for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaError::Malformed(_) => "malformed",
            SchemaError::ContentType { .. } => "content_type",
            SchemaError::InvalidContent { .. } => "invalid_content",
            SchemaError::InvalidParameterName(_) => "invalid_parameter_name",
            SchemaError::InvalidPattern { .. } => "invalid_pattern",
            SchemaError::DuplicateCategoryName(_) => "duplicate_category_name",
            SchemaError::DuplicateParameterName(_) => "duplicate_parameter_name",
            SchemaError::DanglingDependency { .. } => "dangling_dependency",
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Malformed(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaError::Malformed(format!("YAML error: {}", err))
    }
}

/// Result type alias for schema construction
pub type Result<T> = std::result::Result<T, SchemaError>;
