//! Wire shapes accepted before construction checks run

use serde::Deserialize;
use serde_json::Value;

use super::content::{one_or_many, Content};
use super::parameter::{is_valid_parameter_name, Category, Extensions, InputKind, Parameter};
use crate::error::{Result, SchemaError};

#[derive(Debug, Deserialize)]
pub(crate) struct RawSchema {
    #[serde(rename = "paramCategories")]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub params: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub input_kind: InputKind,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, deserialize_with = "one_or_many")]
    pub related: Vec<String>,
    pub content: Value,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl RawCategory {
    pub fn into_category(self) -> Result<Category> {
        let params = self
            .params
            .into_iter()
            .map(RawParameter::into_parameter)
            .collect::<Result<Vec<_>>>()?;

        Ok(Category {
            name: self.name,
            description: self.description,
            params,
        })
    }
}

impl RawParameter {
    pub fn into_parameter(self) -> Result<Parameter> {
        if !is_valid_parameter_name(&self.name) {
            return Err(SchemaError::InvalidParameterName(self.name));
        }

        let content = Content::from_value(&self.name, self.content)?;

        Ok(Parameter {
            name: self.name,
            input_kind: self.input_kind,
            description: self.description,
            required: self.required,
            related: self.related,
            content,
            extensions: self.extensions,
        })
    }
}
