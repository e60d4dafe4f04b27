//! Required field rule
//!
//! A required parameter must have an entry in the submission data. An
//! explicit `null` counts as present; emptiness is not checked here.

use serde_json::{Map, Value};

use super::ErrorSink;
use crate::submission::ErrorCode;

/// Returns true when the field is present and content rules may run
pub fn check(sink: &mut ErrorSink<'_>, required: bool, name: &str, data: &Map<String, Value>) -> bool {
    if data.contains_key(name) {
        return true;
    }
    if required {
        let message = format!("{} is required", sink.label());
        sink.report(ErrorCode::Required, message);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Content, InputKind, Parameter, StringContent};
    use serde_json::json;

    fn param() -> Parameter {
        Parameter::new(
            "x",
            InputKind::TextField,
            "X field",
            Content::String(StringContent::new()),
        )
    }

    #[test]
    fn test_missing_required_field() {
        let p = param();
        let mut errors = Vec::new();
        let present = check(&mut ErrorSink::new(&p, &mut errors), true, "x", &Map::new());

        assert!(!present);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Required);
        assert_eq!(errors[0].message, "X field is required");
    }

    #[test]
    fn test_missing_optional_field_is_silent() {
        let p = param();
        let mut errors = Vec::new();
        let present = check(&mut ErrorSink::new(&p, &mut errors), false, "x", &Map::new());

        assert!(!present);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_null_counts_as_present() {
        let p = param();
        let mut data = Map::new();
        data.insert("x".to_string(), json!(null));
        let mut errors = Vec::new();

        assert!(check(&mut ErrorSink::new(&p, &mut errors), true, "x", &data));
        assert!(errors.is_empty());
    }
}
