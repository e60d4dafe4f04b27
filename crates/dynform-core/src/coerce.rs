//! Coercion of submitted JSON values
//!
//! Submissions are loosely typed: a number field may arrive as `"42"` and a
//! text field as `42`. These helpers define the one textual and one numeric
//! reading the rules apply.

use serde_json::Value;
use std::borrow::Cow;

/// Textual representation of a submitted value
///
/// Strings are taken verbatim. Booleans and `null` read as `True`, `False`
/// and `None`. Numbers, arrays and objects use their compact JSON form.
pub fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::Null => Cow::Borrowed("None"),
        other => Cow::Owned(other.to_string()),
    }
}

/// Length of the textual representation in Unicode scalar values
pub fn text_len(value: &Value) -> usize {
    as_text(value).chars().count()
}

/// Numeric reading of a submitted value, if it has one
///
/// Numbers convert directly, strings are parsed after trimming surrounding
/// whitespace, booleans read as 1 and 0. `null`, arrays and objects have
/// no numeric reading.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
