//! Schema model
//!
//! A [`Schema`] is built once from a raw definition and is immutable
//! afterwards. Construction either yields a fully consistent schema or a
//! single [`SchemaError`]; there is no partially accepted schema.
//!
//! Checks run in this order, the first failure aborting construction:
//!
//! 1. each parameter's `content` is dispatched on its `type` tag, its name
//!    and body are checked and string patterns are compiled
//! 2. all parameter names are collected
//! 3. category names must be unique
//! 4. parameter names must be unique across all categories
//! 5. every `related` entry must name an existing parameter

pub mod content;
pub mod parameter;
mod raw;

pub use content::{
    BooleanContent, Content, DateContent, DateKind, DependentEnumContent, EnumContent,
    EnumOption, Layout, NumberContent, NumberKind, OptionResolution, RangeContent, StringContent,
};
pub use parameter::{
    is_valid_parameter_name, Category, DeclaredRule, Extensions, InputKind, Parameter, UiHints,
    VisibilityCondition,
};

use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error::{Result, SchemaError};
use raw::RawSchema;

/// A validated form definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "paramCategories")]
    categories: Vec<Category>,
    #[serde(skip)]
    index: HashMap<String, (usize, usize)>,
}

impl Schema {
    /// Build a schema from already-typed categories
    pub fn new(mut categories: Vec<Category>) -> Result<Self> {
        for category in &mut categories {
            for param in &mut category.params {
                if !is_valid_parameter_name(&param.name) {
                    return Err(SchemaError::InvalidParameterName(param.name.clone()));
                }
                param.content.prepare(&param.name)?;
            }
        }

        let mut category_names = HashSet::new();
        for category in &categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(SchemaError::DuplicateCategoryName(category.name.clone()));
            }
        }

        let mut index = HashMap::new();
        for (ci, category) in categories.iter().enumerate() {
            for (pi, param) in category.params.iter().enumerate() {
                if index.insert(param.name.clone(), (ci, pi)).is_some() {
                    return Err(SchemaError::DuplicateParameterName(param.name.clone()));
                }
            }
        }

        for param in categories.iter().flat_map(|c| c.params.iter()) {
            if let Some(missing) = param.related.iter().find(|r| !index.contains_key(*r)) {
                return Err(SchemaError::DanglingDependency {
                    param: param.name.clone(),
                    missing: missing.clone(),
                });
            }
        }

        tracing::debug!(
            categories = categories.len(),
            parameters = index.len(),
            "Schema constructed"
        );

        Ok(Self { categories, index })
    }

    /// Build a schema from a raw JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawSchema = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    /// Build a schema from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawSchema = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Build a schema from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: RawSchema = serde_yaml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSchema) -> Result<Self> {
        let categories = raw
            .categories
            .into_iter()
            .map(|c| c.into_category())
            .collect::<Result<Vec<_>>>()?;
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All parameters in category-then-declaration order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.categories.iter().flat_map(|c| c.params.iter())
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        let &(ci, pi) = self.index.get(name)?;
        self.categories.get(ci)?.params.get(pi)
    }

    pub fn parameter_count(&self) -> usize {
        self.index.len()
    }

    /// Serialize back to the wire shape
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json_str(s)
    }
}
