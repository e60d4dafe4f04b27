//! Typed content variants
//!
//! A parameter's `content` block is a closed sum type. The wire `type` tag
//! selects the variant when a definition is parsed and is derived from the
//! variant when it is serialized; it cannot be set independently.

use fancy_regex::Regex;
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::coerce;
use crate::error::{Result, SchemaError};

/// A single selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Display text
    pub label: String,
    /// Submitted value
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl EnumOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon: None,
            disabled: None,
            tooltip: None,
        }
    }
}

/// Radio group orientation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
}

/// Static option list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumContent {
    #[serde(rename = "values")]
    pub options: Vec<EnumOption>,
    #[serde(default, deserialize_with = "nullable")]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Opaque endpoint a renderer may load options from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_duration: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub searchable: bool,
}

impl EnumContent {
    pub fn new(options: Vec<EnumOption>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn multiple(mut self, max_selections: Option<u32>) -> Self {
        self.multiple = true;
        self.max_selections = max_selections;
        self
    }
}

/// Option list conditional on the value of one or more parent parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentEnumContent {
    #[serde(deserialize_with = "one_or_many")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, Vec<EnumOption>>>,
    /// Opaque endpoint for externally fetched options; never resolved here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default = "default_true")]
    pub cascade_reset: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub searchable: bool,
    #[serde(default = "default_min_search_length")]
    pub min_search_length: u32,
}

fn default_true() -> bool {
    true
}

fn default_min_search_length() -> u32 {
    2
}

impl DependentEnumContent {
    pub fn new<I, S>(depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            mapping: None,
            source: None,
            cascade_reset: true,
            searchable: false,
            min_search_length: default_min_search_length(),
        }
    }

    pub fn with_mapping(mut self, mapping: BTreeMap<String, Vec<EnumOption>>) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The parent whose value selects the option list
    pub fn primary_parent(&self) -> Option<&str> {
        self.depends_on.first().map(String::as_str)
    }

    /// Work out which options apply given the current form data
    ///
    /// Only the primary parent participates in the lookup. A `source` is
    /// handed back untouched for the caller to fetch.
    pub fn resolve(&self, data: &Map<String, Value>) -> OptionResolution<'_> {
        let Some(parent) = self.primary_parent() else {
            return OptionResolution::Unavailable;
        };

        let value = match data.get(parent) {
            None | Some(Value::Null) => return OptionResolution::AwaitingParent { parent },
            Some(v) => coerce::as_text(v).into_owned(),
        };
        if value.is_empty() {
            return OptionResolution::AwaitingParent { parent };
        }

        if let Some(options) = self.mapping.as_ref().and_then(|m| m.get(&value)) {
            return OptionResolution::Static {
                options: options.as_slice(),
            };
        }

        match &self.source {
            Some(source) => OptionResolution::Remote {
                source,
                parent,
                value,
            },
            None => OptionResolution::Unavailable,
        }
    }
}

/// Outcome of [`DependentEnumContent::resolve`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OptionResolution<'a> {
    /// The primary parent has no value yet
    AwaitingParent { parent: &'a str },
    /// Options come from the static mapping
    Static { options: &'a [EnumOption] },
    /// Options must be fetched by the caller
    Remote {
        source: &'a str,
        parent: &'a str,
        value: String,
    },
    /// Nothing is known for this parent value
    Unavailable,
}

/// Text input constraints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Declared for renderers; not enforced by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip)]
    matcher: Option<Regex>,
}

impl PartialEq for StringContent {
    fn eq(&self, other: &Self) -> bool {
        self.min_length == other.min_length
            && self.max_length == other.max_length
            && self.pattern == other.pattern
            && self.placeholder == other.placeholder
            && self.multiline == other.multiline
            && self.rows == other.rows
    }
}

impl StringContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Set the pattern; it is compiled when the owning schema is built
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.matcher = None;
        self
    }

    /// Compile `pattern` with match-from-start semantics
    ///
    /// The dialect includes look-around and backreferences.
    fn compile(&mut self, param: &str) -> Result<()> {
        let Some(pattern) = &self.pattern else {
            self.matcher = None;
            return Ok(());
        };

        let invalid = |err: fancy_regex::Error| SchemaError::InvalidPattern {
            param: param.to_string(),
            pattern: pattern.clone(),
            reason: err.to_string(),
        };

        // Check the bare pattern first so an unbalanced group cannot be
        // closed by the anchoring wrapper.
        Regex::new(pattern).map_err(invalid)?;
        self.matcher = Some(Regex::new(&format!("^(?:{})", pattern)).map_err(invalid)?);
        Ok(())
    }

    /// Whether `text` satisfies the pattern; `None` when no pattern is usable
    ///
    /// A match that exceeds the backtracking limit counts as a mismatch.
    pub fn matches(&self, text: &str) -> Option<bool> {
        self.matcher.as_ref().map(|re| {
            re.is_match(text).unwrap_or_else(|err| {
                tracing::warn!(pattern = re.as_str(), error = %err, "Pattern match aborted");
                false
            })
        })
    }
}

/// Numeric flavour carried by the `number`/`integer` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberKind {
    #[default]
    Number,
    Integer,
}

/// Numeric input constraints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberContent {
    #[serde(skip)]
    pub kind: NumberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl NumberContent {
    pub fn number() -> Self {
        Self::default()
    }

    pub fn integer() -> Self {
        Self {
            kind: NumberKind::Integer,
            ..Default::default()
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Temporal flavour carried by the `date`/`datetime`/`time` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateKind {
    #[default]
    Date,
    DateTime,
    Time,
}

/// Date input constraints; bounds are ISO strings and are not enforced here
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateContent {
    #[serde(skip)]
    pub kind: DateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_dates: Option<Vec<String>>,
}

/// Slider bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeContent {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl RangeContent {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
            default_value: None,
            show_labels: None,
            currency: None,
        }
    }
}

/// Checkbox/switch default
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
}

/// Type-specific configuration of a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Enum(EnumContent),
    DependentEnum(DependentEnumContent),
    String(StringContent),
    Number(NumberContent),
    Date(DateContent),
    Range(RangeContent),
    Boolean(BooleanContent),
}

impl Content {
    /// The wire tag for this variant
    pub fn type_tag(&self) -> &'static str {
        match self {
            Content::Enum(_) => "enum",
            Content::DependentEnum(_) => "dependent_enum",
            Content::String(_) => "string",
            Content::Number(c) => match c.kind {
                NumberKind::Number => "number",
                NumberKind::Integer => "integer",
            },
            Content::Date(c) => match c.kind {
                DateKind::Date => "date",
                DateKind::DateTime => "datetime",
                DateKind::Time => "time",
            },
            Content::Range(_) => "number_range",
            Content::Boolean(_) => "boolean",
        }
    }

    /// Dispatch a raw content block on its embedded `type` tag
    pub fn from_value(param: &str, value: Value) -> Result<Self> {
        let tag = match value.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => other.to_string(),
            None if value.is_object() => String::new(),
            None => {
                return Err(SchemaError::invalid_content(
                    param,
                    "content must be an object",
                ))
            }
        };

        let content = match tag.as_str() {
            "enum" => Content::Enum(body(param, value)?),
            "dependent_enum" => Content::DependentEnum(body(param, value)?),
            "string" => Content::String(body(param, value)?),
            "number" | "integer" => {
                let mut c: NumberContent = body(param, value)?;
                if tag == "integer" {
                    c.kind = NumberKind::Integer;
                }
                Content::Number(c)
            }
            "date" | "datetime" | "time" => {
                let mut c: DateContent = body(param, value)?;
                c.kind = match tag.as_str() {
                    "datetime" => DateKind::DateTime,
                    "time" => DateKind::Time,
                    _ => DateKind::Date,
                };
                Content::Date(c)
            }
            "number_range" => Content::Range(body(param, value)?),
            "boolean" => Content::Boolean(body(param, value)?),
            _ => {
                return Err(SchemaError::ContentType {
                    param: param.to_string(),
                    tag,
                })
            }
        };

        Ok(content)
    }

    /// Check variant invariants and compile patterns
    pub(crate) fn prepare(&mut self, param: &str) -> Result<()> {
        match self {
            Content::String(c) => c.compile(param),
            Content::DependentEnum(c) if c.depends_on.is_empty() => Err(
                SchemaError::invalid_content(param, "dependsOn must name at least one parameter"),
            ),
            Content::Range(c) => match &c.default_value {
                Some(v) if v.is_empty() || v.len() > 2 => Err(SchemaError::invalid_content(
                    param,
                    format!("defaultValue must hold 1 or 2 numbers, got {}", v.len()),
                )),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

fn body<T: DeserializeOwned>(param: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| SchemaError::invalid_content(param, e.to_string()))
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let body = match self {
            Content::Enum(c) => serde_json::to_value(c),
            Content::DependentEnum(c) => serde_json::to_value(c),
            Content::String(c) => serde_json::to_value(c),
            Content::Number(c) => serde_json::to_value(c),
            Content::Date(c) => serde_json::to_value(c),
            Content::Range(c) => serde_json::to_value(c),
            Content::Boolean(c) => serde_json::to_value(c),
        }
        .map_err(S::Error::custom)?;

        let mut map = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert("type".to_string(), Value::String(self.type_tag().to_string()));
        map.serialize(serializer)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Accept `null`, a single string, or a list of strings
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// Treat an explicit `null` like an absent key
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_tag() {
        let c = Content::from_value("x", json!({"type": "string", "minLength": 3})).unwrap();
        match c {
            Content::String(s) => assert_eq!(s.min_length, Some(3)),
            other => panic!("unexpected variant {}", other),
        }

        let c = Content::from_value("x", json!({"type": "integer", "min": 1})).unwrap();
        assert_eq!(c.type_tag(), "integer");

        let c = Content::from_value("x", json!({"type": "time"})).unwrap();
        assert_eq!(c.type_tag(), "time");
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = Content::from_value("x", json!({"type": "colour"})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ContentType {
                param: "x".to_string(),
                tag: "colour".to_string()
            }
        );

        let err = Content::from_value("x", json!({"minLength": 2})).unwrap_err();
        assert!(matches!(err, SchemaError::ContentType { .. }));
    }

    #[test]
    fn test_invalid_body_rejected() {
        let err = Content::from_value("price", json!({"type": "number_range", "min": 0}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidContent { .. }));

        let err = Content::from_value("pw", json!({"type": "string", "minLength": -1}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidContent { .. }));
    }

    #[test]
    fn test_serialized_tag_follows_variant() {
        let c = Content::Number(NumberContent::integer().with_min(0.0));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "integer");
        assert_eq!(v["min"], 0.0);

        let c = Content::Enum(EnumContent::new(vec![EnumOption::new("A", "a")]));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "enum");
        assert_eq!(v["values"][0]["value"], "a");
    }

    #[test]
    fn test_depends_on_accepts_single_name() {
        let c = Content::from_value(
            "city",
            json!({"type": "dependent_enum", "dependsOn": "region"}),
        )
        .unwrap();
        match c {
            Content::DependentEnum(d) => {
                assert_eq!(d.depends_on, vec!["region".to_string()]);
                assert!(d.cascade_reset);
                assert_eq!(d.min_search_length, 2);
            }
            other => panic!("unexpected variant {}", other),
        }
    }

    #[test]
    fn test_prepare_checks_range_default() {
        let mut c = Content::Range(RangeContent {
            default_value: Some(vec![1.0, 2.0, 3.0]),
            ..RangeContent::new(0.0, 10.0)
        });
        assert!(matches!(
            c.prepare("r"),
            Err(SchemaError::InvalidContent { .. })
        ));
    }

    #[test]
    fn test_pattern_matches_from_start() {
        let mut s = StringContent::new().with_pattern("[0-9]+");
        s.compile("zip").unwrap();
        assert_eq!(s.matches("123abc"), Some(true));
        assert_eq!(s.matches("abc123"), Some(false));

        let mut bad = StringContent::new().with_pattern("a)(b");
        assert!(matches!(
            bad.compile("x"),
            Err(SchemaError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_pattern_supports_look_ahead() {
        let mut s = StringContent::new()
            .with_pattern(r"^(?=.*[A-Za-z])(?=.*\d)[A-Za-z\d@$!%*#?&]{8,}$");
        s.compile("password").unwrap();
        assert_eq!(s.matches("longenough1"), Some(true));
        assert_eq!(s.matches("abc1"), Some(false));
        assert_eq!(s.matches("lettersonly"), Some(false));
        assert_eq!(s.matches("12345678"), Some(false));

        let mut repeated = StringContent::new().with_pattern(r"(\w)\1");
        repeated.compile("code").unwrap();
        assert_eq!(repeated.matches("aab"), Some(true));
        assert_eq!(repeated.matches("abb"), Some(false));
    }

    #[test]
    fn test_null_flags_read_as_false() {
        let c = Content::from_value(
            "tags",
            json!({"type": "enum", "values": [], "multiple": null, "searchable": null}),
        )
        .unwrap();
        assert_eq!(c, Content::Enum(EnumContent::new(vec![])));

        let c = Content::from_value("bio", json!({"type": "string", "multiline": null})).unwrap();
        assert_eq!(c, Content::String(StringContent::new()));

        let c = Content::from_value(
            "city",
            json!({"type": "dependent_enum", "dependsOn": "region", "searchable": null}),
        )
        .unwrap();
        assert_eq!(c, Content::DependentEnum(DependentEnumContent::new(["region"])));
    }

    #[test]
    fn test_multiple_selection_wire_names() {
        let content = EnumContent::new(vec![EnumOption::new("Red", "red")]).multiple(Some(2));
        let v = serde_json::to_value(Content::Enum(content)).unwrap();
        assert_eq!(v["multiple"], true);
        assert_eq!(v["maxSelections"], 2);
        assert!(v.get("layout").is_none());
    }

    #[test]
    fn test_resolve_dependent_options() {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "GB".to_string(),
            vec![EnumOption::new("England", "england")],
        );
        let content = DependentEnumContent::new(["country"])
            .with_mapping(mapping)
            .with_source("/api/regions?country={country}");

        let data = Map::new();
        assert_eq!(
            content.resolve(&data),
            OptionResolution::AwaitingParent { parent: "country" }
        );

        let mut data = Map::new();
        data.insert("country".into(), json!("GB"));
        match content.resolve(&data) {
            OptionResolution::Static { options } => assert_eq!(options[0].value, "england"),
            other => panic!("unexpected resolution {:?}", other),
        }

        data.insert("country".into(), json!("FR"));
        assert_eq!(
            content.resolve(&data),
            OptionResolution::Remote {
                source: "/api/regions?country={country}",
                parent: "country",
                value: "FR".to_string(),
            }
        );
    }
}
