//! String content rules: minimum length and pattern
//!
//! `maxLength` is carried by the content for renderers but is not checked.

use serde_json::Value;

use super::ErrorSink;
use crate::coerce;
use crate::model::StringContent;
use crate::submission::ErrorCode;

pub fn check(sink: &mut ErrorSink<'_>, content: &StringContent, value: &Value) {
    let text = coerce::as_text(value);

    if let Some(min) = content.min_length.filter(|&m| m > 0) {
        if text.chars().count() < min {
            let message = format!("{} must be at least {} characters", sink.label(), min);
            sink.report(ErrorCode::MinLength, message);
        }
    }

    if content.matches(&text) == Some(false) {
        let message = format!("{} has invalid format", sink.label());
        sink.report(ErrorCode::Pattern, message);
    }
}
