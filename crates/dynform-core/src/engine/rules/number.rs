//! Numeric content rules: coercion, minimum and maximum
//!
//! A value without a numeric reading yields a single `type` error and the
//! bounds are skipped. Otherwise both bounds are checked independently.

use serde_json::Value;

use super::ErrorSink;
use crate::coerce;
use crate::model::NumberContent;
use crate::submission::ErrorCode;

pub fn check(sink: &mut ErrorSink<'_>, content: &NumberContent, value: &Value) {
    let Some(number) = coerce::as_number(value) else {
        let message = format!("{} must be a number", sink.label());
        sink.report(ErrorCode::Type, message);
        return;
    };

    if let Some(min) = content.min {
        if number < min {
            let message = format!("{} must be at least {}", sink.label(), bound(min));
            sink.report(ErrorCode::Min, message);
        }
    }

    if let Some(max) = content.max {
        if number > max {
            let message = format!("{} must be at most {}", sink.label(), bound(max));
            sink.report(ErrorCode::Max, message);
        }
    }
}

/// Render a bound the way it is declared: always as a decimal, so `5000`
/// prints as `5000.0` and `12.5` stays `12.5`
fn bound(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Content, InputKind, Parameter};
    use crate::submission::ValidationError;
    use serde_json::json;

    fn run(content: NumberContent, value: Value) -> Vec<ValidationError> {
        let param = Parameter::new(
            "price",
            InputKind::NumberField,
            "Price",
            Content::Number(content.clone()),
        );
        let mut errors = Vec::new();
        check(&mut ErrorSink::new(&param, &mut errors), &content, &value);
        errors
    }

    fn bounded() -> NumberContent {
        NumberContent::number().with_min(0.0).with_max(5000.0)
    }

    #[test]
    fn test_within_bounds() {
        assert!(run(bounded(), json!(2500)).is_empty());
        assert!(run(bounded(), json!(0)).is_empty());
        assert!(run(bounded(), json!(5000)).is_empty());
        assert!(run(bounded(), json!("125.5")).is_empty());
    }

    #[test]
    fn test_above_max() {
        let errors = run(bounded(), json!(6000));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Max);
        assert_eq!(errors[0].message, "Price must be at most 5000.0");
    }

    #[test]
    fn test_below_min() {
        let errors = run(bounded(), json!(-5));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Min);
        assert_eq!(errors[0].message, "Price must be at least 0.0");
    }

    #[test]
    fn test_bound_rendering() {
        assert_eq!(bound(0.0), "0.0");
        assert_eq!(bound(5000.0), "5000.0");
        assert_eq!(bound(12.5), "12.5");
        assert_eq!(bound(-3.0), "-3.0");

        let content = NumberContent::number().with_min(0.5);
        let errors = run(content, json!(0.25));
        assert_eq!(errors[0].message, "Price must be at least 0.5");
    }

    #[test]
    fn test_non_numeric_skips_bounds() {
        let errors = run(bounded(), json!("abc"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Type);
        assert_eq!(errors[0].message, "Price must be a number");

        let errors = run(bounded(), json!(null));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Type);
    }

    #[test]
    fn test_inverted_bounds_fire_both() {
        let content = NumberContent::integer().with_min(10.0).with_max(5.0);
        let codes: Vec<_> = run(content, json!(7)).iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::Min, ErrorCode::Max]);
    }
}
