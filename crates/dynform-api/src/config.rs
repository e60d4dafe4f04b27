//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `DYNFORM_*` environment variables. Command-line flags are applied last by
//! the binary.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_VAR: &str = "DYNFORM_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Extra schema definitions, one `*.json`/`*.yaml`/`*.yml` file per form
    pub schema_dir: Option<PathBuf>,
    pub log_format: LogFormat,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://localhost:5173".to_string(),
            ],
            schema_dir: None,
            log_format: LogFormat::Pretty,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Defaults, then `path` (or `DYNFORM_CONFIG`) if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `DYNFORM_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DYNFORM_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DYNFORM_PORT") {
            self.port = parse_var("DYNFORM_PORT", &port)?;
        }
        if let Some(origins) = lookup("DYNFORM_ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(dir) = lookup("DYNFORM_SCHEMA_DIR") {
            self.schema_dir = Some(PathBuf::from(dir));
        }
        if let Some(format) = lookup("DYNFORM_LOG_FORMAT") {
            self.log_format = parse_var("DYNFORM_LOG_FORMAT", &format)?;
        }
        if let Some(limit) = lookup("DYNFORM_MAX_BODY_BYTES") {
            self.max_body_bytes = parse_var("DYNFORM_MAX_BODY_BYTES", &limit)?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "host".to_string(),
            value: addr,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
        assert_eq!(config.allowed_origins.len(), 3);
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
port = 9090
schema_dir = "/etc/dynform/schemas"
log_format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.schema_dir.as_deref(),
            Some(Path::new("/etc/dynform/schemas"))
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ServerConfig::from_toml_str("port = \"eighty\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("DYNFORM_HOST", "127.0.0.1"),
                ("DYNFORM_PORT", "8081"),
                ("DYNFORM_ALLOWED_ORIGINS", "https://forms.example.com, http://localhost:8080"),
                ("DYNFORM_LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(
            config.allowed_origins,
            vec!["https://forms.example.com", "http://localhost:8080"]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env(env(&[("DYNFORM_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "DYNFORM_PORT"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/dynform.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
