//! Configuration parsing and management.

use crate::chunk::{ChunkMerger, DEFAULT_HEADER_MARKER, DEFAULT_LABEL};
use crate::expand::Delimiters;
use crate::templates::TemplateSource;
use serde::{Deserialize, Serialize};
use stitchwork_types::Environment;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Main configuration struct matching the stitchwork.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<String>,

    /// Built-in template name or a path relative to the config file
    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Ambient variables visible to every tag
    #[serde(default)]
    pub variables: Environment,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_delimiters() -> Vec<String> {
    vec!["{{".to_string(), "}}".to_string()]
}

fn default_template() -> String {
    String::from("markdown")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    #[serde(default = "default_header_marker")]
    pub header_marker: String,

    #[serde(default = "default_label")]
    pub default_label: String,

    #[serde(default)]
    pub keep_options: bool,
}

fn default_header_marker() -> String {
    String::from(DEFAULT_HEADER_MARKER)
}

fn default_label() -> String {
    String::from(DEFAULT_LABEL)
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            header_marker: default_header_marker(),
            default_label: default_label(),
            keep_options: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            template: default_template(),
            chunk: ChunkConfig::default(),
            variables: Environment::new(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration from a file if it exists, defaults otherwise
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Parse configuration from YAML text; an empty document gives defaults
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.delimiters()?;
        self.chunk_merger()?;
        Ok(())
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Directory the config file lives in
    pub fn base_dir(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }

    /// Resolve a path relative to the config file location
    pub fn resolve_relative(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.base_dir() {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }

    pub fn delimiters(&self) -> Result<Delimiters, ConfigError> {
        Delimiters::try_from(self.delimiters.as_slice()).map_err(|e| ConfigError::InvalidField {
            field: "delimiters",
            message: e.to_string(),
        })
    }

    pub fn chunk_merger(&self) -> Result<ChunkMerger, ConfigError> {
        let merger = ChunkMerger::new()
            .with_header_marker(self.chunk.header_marker.as_str())
            .map_err(|e| ConfigError::InvalidField {
                field: "chunk.header_marker",
                message: e.to_string(),
            })?;
        Ok(merger
            .with_default_label(self.chunk.default_label.as_str())
            .with_keep_options(self.chunk.keep_options))
    }

    /// The configured host template
    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::resolve(&self.template, self.base_dir())
    }
}
