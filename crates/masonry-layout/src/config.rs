//! Loading grid props from YAML or JSON.

use crate::masonry::MasonryProps;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a grid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

impl MasonryProps {
    /// Parse props from a YAML document.
    ///
    /// ```
    /// use masonry_layout::MasonryProps;
    ///
    /// let props = MasonryProps::from_yaml("breakpointCols: 3\nclassName: grid\n").unwrap();
    /// assert_eq!(props.breakpoint_cols.resolve(800.0), 3);
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let props = serde_yaml_ng::from_str(source)?;
        Ok(props)
    }

    /// Parse props from a JSON document.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let props = serde_json::from_str(source)?;
        Ok(props)
    }

    /// Load props from a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml,
            "json" => Self::from_json,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let source = std::fs::read_to_string(path)?;
        let props = parse(&source)?;
        tracing::debug!(path = %path.display(), "loaded masonry config");
        Ok(props)
    }

    /// Serialize props as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
