//! Rule framework for submission validation
//!
//! Each rule family lives in its own module and reports violations through
//! an [`ErrorSink`]. The engine chooses which families apply by matching on
//! the parameter's content variant; rules never inspect other variants.

pub mod number;
pub mod required;
pub mod string;

use crate::model::Parameter;
use crate::submission::{ErrorCode, ValidationError};

/// Collects violations for one parameter in the order they are found
pub struct ErrorSink<'a> {
    param: &'a Parameter,
    errors: &'a mut Vec<ValidationError>,
}

impl<'a> ErrorSink<'a> {
    pub fn new(param: &'a Parameter, errors: &'a mut Vec<ValidationError>) -> Self {
        Self { param, errors }
    }

    /// Human-readable label used as the subject of messages
    pub fn label(&self) -> &str {
        &self.param.description
    }

    /// Record a violation for this parameter
    pub fn report(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.errors
            .push(ValidationError::new(&self.param.name, code, message));
    }
}
