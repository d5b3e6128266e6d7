//! Radie Configuration Management
//!
//! Handles configuration from a TOML file and environment variables,
//! with defaults matching the conventional `outputs/` layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Input and output locations
    pub paths: PathsConfig,

    /// Extraction stage settings
    pub extraction: ExtractionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Load from a TOML file if it exists, otherwise start from defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(dir) = std::env::var("RADIE_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("RADIE_XML_DIR") {
            self.paths.xml_dir = Some(PathBuf::from(dir));
        }
        if let Ok(template) = std::env::var("RADIE_DATASET_TEMPLATE") {
            self.paths.dataset_template_csv = Some(PathBuf::from(template));
        }
        if let Ok(suffix) = std::env::var("RADIE_INPUT_SUFFIX") {
            if suffix.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "RADIE_INPUT_SUFFIX".to_string(),
                    value: suffix,
                });
            }
            self.extraction.input_suffix = suffix;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = std::env::var("RADIE_LOG_JSON") {
            self.logging.json_format = json.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RADIE_LOG_JSON".to_string(),
                value: json,
            })?;
        }

        Ok(())
    }
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory receiving `extracted.jsonl` and `dataset_auto.csv`
    pub output_dir: PathBuf,

    /// Directory of TEI documents (defaults to `<output_dir>/grobid_xml`)
    pub xml_dir: Option<PathBuf>,

    /// CSV template whose header row defines the dataset schema
    pub dataset_template_csv: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            xml_dir: None,
            dataset_template_csv: None,
        }
    }
}

impl PathsConfig {
    /// Resolved TEI input directory
    pub fn xml_dir(&self) -> PathBuf {
        self.xml_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("grobid_xml"))
    }

    /// Location of the extraction JSONL
    pub fn extracted_jsonl(&self) -> PathBuf {
        self.output_dir.join("extracted.jsonl")
    }

    /// Configured dataset template, required by the mapping stage
    pub fn dataset_template(&self) -> Result<&Path, ConfigError> {
        self.dataset_template_csv
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired("paths.dataset_template_csv".to_string()))
    }

    /// Location of the mapped dataset CSV
    pub fn dataset_csv(&self) -> PathBuf {
        self.output_dir.join("dataset_auto.csv")
    }
}

/// Extraction stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// File name suffix selecting input documents
    pub input_suffix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input_suffix: ".tei.xml".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
