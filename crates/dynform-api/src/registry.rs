//! Schema registry
//!
//! Maps form ids to constructed schemas. Built once at startup from the
//! embedded example forms and an optional directory of definitions, then
//! shared read-only.

use chrono::{Duration, NaiveDate, Utc};
use dynform_core::{Schema, SchemaError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const BUILTIN: [(&str, &str); 3] = [
    ("ecommerce_filter", include_str!("../schemas/ecommerce_filter.json")),
    ("user_registration", include_str!("../schemas/user_registration.json")),
    ("location_selector", include_str!("../schemas/location_selector.json")),
];

/// Registrants must be at least this many years old
const MINIMUM_AGE_YEARS: i64 = 13;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Schema '{id}' is invalid: {source}")]
    Schema {
        id: String,
        #[source]
        source: SchemaError,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<(String, Arc<Schema>)>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded example forms
    pub fn builtin() -> Result<Self, RegistryError> {
        let today = Utc::now().date_naive();
        let mut registry = Self::new();

        for (id, text) in BUILTIN {
            let mut value: Value =
                serde_json::from_str(text).map_err(|e| RegistryError::Schema {
                    id: id.to_string(),
                    source: e.into(),
                })?;
            if id == "user_registration" {
                set_birth_date_cutoff(&mut value, today);
            }
            let schema = Schema::from_value(value).map_err(|source| RegistryError::Schema {
                id: id.to_string(),
                source,
            })?;
            registry.insert(id, schema);
        }

        Ok(registry)
    }

    /// Load every `*.json`, `*.yaml` and `*.yml` file in `dir`
    ///
    /// The file stem becomes the form id; an existing id is replaced. Files
    /// are loaded in name order so replacement is deterministic.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, RegistryError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if path.is_file() && schema_format(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();

        for path in &files {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(path).map_err(io_error(path))?;
            let parsed = match schema_format(path) {
                Some(SchemaFormat::Yaml) => Schema::from_yaml_str(&text),
                _ => Schema::from_json_str(&text),
            };
            let schema = parsed.map_err(|source| RegistryError::Schema {
                id: id.to_string(),
                source,
            })?;

            tracing::info!(form_id = id, path = %path.display(), "Loaded schema");
            self.insert(id, schema);
        }

        Ok(files.len())
    }

    pub fn insert(&mut self, id: impl Into<String>, schema: Schema) {
        let id = id.into();
        let schema = Arc::new(schema);
        match self.index.get(&id) {
            Some(&i) => {
                tracing::warn!(form_id = %id, "Replacing existing schema");
                self.entries[i].1 = schema;
            }
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, schema));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Schema>> {
        self.index.get(id).map(|&i| Arc::clone(&self.entries[i].1))
    }

    /// Form ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RegistryError {
    let path = path.to_path_buf();
    move |source| RegistryError::Io { path, source }
}

enum SchemaFormat {
    Json,
    Yaml,
}

fn schema_format(path: &Path) -> Option<SchemaFormat> {
    match path.extension()?.to_str()? {
        "json" => Some(SchemaFormat::Json),
        "yaml" | "yml" => Some(SchemaFormat::Yaml),
        _ => None,
    }
}

/// Fill in the latest allowed birth date unless the definition pins one
fn set_birth_date_cutoff(schema: &mut Value, today: NaiveDate) {
    let cutoff = today - Duration::days(MINIMUM_AGE_YEARS * 365);
    let Some(categories) = schema
        .get_mut("paramCategories")
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for param in categories
        .iter_mut()
        .filter_map(|c| c.get_mut("params").and_then(Value::as_array_mut))
        .flatten()
    {
        if param.get("name").and_then(Value::as_str) != Some("birth_date") {
            continue;
        }
        if let Some(content) = param.get_mut("content").and_then(Value::as_object_mut) {
            content
                .entry("max")
                .or_insert_with(|| Value::String(cutoff.format("%Y-%m-%d").to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_core::Content;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_builtin_forms_construct() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(
            registry.ids(),
            vec!["ecommerce_filter", "user_registration", "location_selector"]
        );

        let registration = registry.get("user_registration").unwrap();
        assert_eq!(registration.parameter_count(), 10);
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_birth_date_cutoff() {
        let mut value: Value = serde_json::from_str(BUILTIN[1].1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        set_birth_date_cutoff(&mut value, today);

        let schema = Schema::from_value(value).unwrap();
        match &schema.parameter("birth_date").unwrap().content {
            Content::Date(date) => {
                assert_eq!(date.min.as_deref(), Some("1900-01-01"));
                assert_eq!(date.max.as_deref(), Some("2011-06-05"));
            }
            other => panic!("unexpected content {}", other),
        }
    }

    #[test]
    fn test_password_pattern() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("user_registration").unwrap();
        let Content::String(password) = &schema.parameter("password").unwrap().content else {
            panic!("password should be a string field");
        };

        assert_eq!(password.matches("longenough1"), Some(true));
        assert_eq!(password.matches("lettersonly"), Some(false));
        assert_eq!(password.matches("12345678"), Some(false));
        assert_eq!(password.matches("with space 1"), Some(false));
        assert_eq!(password.matches("abc1"), Some(false));
    }

    #[test]
    fn test_short_password_fails_length_and_pattern() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("user_registration").unwrap();
        let data = json!({"password": "abc1"});
        let result = dynform_core::validate_data(&schema, data.as_object().unwrap());

        let codes: Vec<&str> = result
            .errors
            .iter()
            .filter(|e| e.field == "password")
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, vec!["minLength", "pattern"]);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut yaml = std::fs::File::create(dir.path().join("feedback.yaml")).unwrap();
        writeln!(
            yaml,
            r#"
paramCategories:
  - name: feedback
    params:
      - name: rating
        type: number_field
        description: Rating
        required: true
        content:
          type: integer
          min: 1
          max: 5
"#
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = SchemaRegistry::builtin().unwrap();
        let loaded = registry.load_dir(dir.path()).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(registry.len(), 4);
        assert!(registry.get("feedback").unwrap().parameter("rating").is_some());
    }

    #[test]
    fn test_load_dir_rejects_invalid_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("broken.json"),
            r#"{"paramCategories": [{"name": "a", "params": []}, {"name": "a", "params": []}]}"#,
        )
        .unwrap();

        let err = SchemaRegistry::new().load_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Schema { ref id, source: SchemaError::DuplicateCategoryName(_) } if id == "broken"
        ));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut registry = SchemaRegistry::builtin().unwrap();
        let empty = Schema::new(Vec::new()).unwrap();
        registry.insert("ecommerce_filter", empty);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("ecommerce_filter").unwrap().parameter_count(), 0);
    }
}
