//! Layered configuration
//!
//! Values resolve in order: built-in defaults, then the global config file
//! (per-user, via the platform config directory), then the project's
//! `.lrt/config.yaml`, then `LRT_*` environment variables. Later layers
//! win. Every key is optional at every layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::project::Project;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("unknown config key '{0}' (see `lrt config keys`)")]
    UnknownKey(String),

    #[error("invalid value '{value}' for key '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("no global config directory available on this platform")]
    NoGlobalDir,
}

/// Resolved configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded in generated input files
    pub author: String,

    /// Default quality level ID for new component records
    pub quality_id: u32,

    /// Default active environment ID for new component records
    pub environment_id: u32,

    /// Default confidence level for bounds, as a fraction
    pub confidence: f64,

    /// Editor command for future interactive use; falls back to $EDITOR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: String::from("unknown"),
            quality_id: 1,
            environment_id: 1,
            confidence: 0.90,
            editor: None,
        }
    }
}

/// One layer of the configuration, everything optional
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    author: Option<String>,
    quality_id: Option<u32>,
    environment_id: Option<u32>,
    confidence: Option<f64>,
    editor: Option<String>,
}

/// Keys accepted by `lrt config set` and `lrt config unset`.
pub const KEYS: &[(&str, &str)] = &[
    ("author", "name recorded in generated input files"),
    ("quality_id", "default quality level ID"),
    ("environment_id", "default active environment ID"),
    ("confidence", "default confidence level, fraction"),
    ("editor", "editor command for interactive use"),
];

impl Config {
    /// Resolve the configuration for an optional project context
    pub fn load(project: Option<&Project>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = Self::global_path() {
            if path.is_file() {
                config.apply(&read_layer(&path)?);
            }
        }
        if let Some(project) = project {
            let path = project.config_path();
            if path.is_file() {
                config.apply(&read_layer(&path)?);
            }
        }
        config.apply_env();

        Ok(config)
    }

    /// Per-user config file location, if the platform exposes one
    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lrt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(author) = &layer.author {
            self.author = author.clone();
        }
        if let Some(quality_id) = layer.quality_id {
            self.quality_id = quality_id;
        }
        if let Some(environment_id) = layer.environment_id {
            self.environment_id = environment_id;
        }
        if let Some(confidence) = layer.confidence {
            self.confidence = confidence;
        }
        if layer.editor.is_some() {
            self.editor = layer.editor.clone();
        }
    }

    fn apply_env(&mut self) {
        if let Ok(author) = std::env::var("LRT_AUTHOR") {
            self.author = author;
        }
        if let Ok(value) = std::env::var("LRT_QUALITY_ID") {
            if let Ok(id) = value.parse() {
                self.quality_id = id;
            }
        }
        if let Ok(value) = std::env::var("LRT_ENVIRONMENT_ID") {
            if let Ok(id) = value.parse() {
                self.environment_id = id;
            }
        }
        if let Ok(value) = std::env::var("LRT_CONFIDENCE") {
            if let Ok(confidence) = value.parse() {
                self.confidence = confidence;
            }
        }
        if let Ok(editor) = std::env::var("LRT_EDITOR") {
            self.editor = Some(editor);
        }
    }
}

/// Set one key in the config file at `path`, creating the file if needed
pub fn set_key(path: &PathBuf, key: &str, value: &str) -> Result<(), ConfigError> {
    let mut layer = if path.is_file() {
        read_layer(path)?
    } else {
        ConfigLayer::default()
    };

    match key {
        "author" => layer.author = Some(value.to_string()),
        "quality_id" => layer.quality_id = Some(parse_value(key, value)?),
        "environment_id" => layer.environment_id = Some(parse_value(key, value)?),
        "confidence" => {
            let confidence: f64 = parse_value(key, value)?;
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "must be a fraction in [0, 1]".to_string(),
                });
            }
            layer.confidence = Some(confidence);
        }
        "editor" => layer.editor = Some(value.to_string()),
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }

    write_layer(path, &layer)
}

/// Remove one key from the config file at `path`
pub fn unset_key(path: &PathBuf, key: &str) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Ok(());
    }
    let mut layer = read_layer(path)?;

    match key {
        "author" => layer.author = None,
        "quality_id" => layer.quality_id = None,
        "environment_id" => layer.environment_id = None,
        "confidence" => layer.confidence = None,
        "editor" => layer.editor = None,
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }

    write_layer(path, &layer)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: format!("not a valid {}", std::any::type_name::<T>()),
    })
}

fn read_layer(path: &PathBuf) -> Result<ConfigLayer, ConfigError> {
    let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yml::from_str(&body).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })
}

fn write_layer(path: &PathBuf, layer: &ConfigLayer) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let body = serde_yml::to_string(layer).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    std::fs::write(path, body).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.quality_id, 1);
        assert_eq!(config.environment_id, 1);
        assert!((config.confidence - 0.90).abs() < 1e-12);
    }

    #[test]
    fn test_project_layer_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        std::fs::write(
            project.config_path(),
            "author: Jane Doe\nenvironment_id: 4\n",
        )
        .unwrap();

        let config = Config::load(Some(&project)).unwrap();
        assert_eq!(config.author, "Jane Doe");
        assert_eq!(config.environment_id, 4);
        // Untouched keys keep their defaults.
        assert_eq!(config.quality_id, 1);
    }

    #[test]
    fn test_set_and_unset_key_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");

        set_key(&path, "confidence", "0.95").unwrap();
        let layer = read_layer(&path).unwrap();
        assert_eq!(layer.confidence, Some(0.95));

        unset_key(&path, "confidence").unwrap();
        let layer = read_layer(&path).unwrap();
        assert_eq!(layer.confidence, None);
    }

    #[test]
    fn test_set_key_rejects_unknown_and_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");

        assert!(matches!(
            set_key(&path, "colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_key(&path, "confidence", "1.5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_key(&path, "quality_id", "high"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
