//! Configuration for report generation
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no
//! file at all) reproduces the stock layout.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File picked up from the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "controlsheet.toml";

/// Main report configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Extra columns placed after "Comments", ahead of any given on the command line
    #[serde(default)]
    pub extra_columns: Vec<String>,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub widths: WidthConfig,
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check values that deserialize fine but cannot be rendered
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style.font_name.trim().is_empty() {
            return Err(ConfigError::Invalid("style.font_name is empty".into()));
        }
        if !(self.style.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "style.font_size must be positive, got {}",
                self.style.font_size
            )));
        }
        self.style.header_fill_rgb()?;

        for (key, widths) in [
            ("widths.progress", &self.widths.progress),
            ("widths.requirement", &self.widths.requirement),
        ] {
            if widths.is_empty() {
                return Err(ConfigError::Invalid(format!("{} is empty", key)));
            }
            if let Some(bad) = widths.iter().find(|w| !(**w > 0.0)) {
                return Err(ConfigError::Invalid(format!(
                    "{} contains a non-positive width: {}",
                    key, bad
                )));
            }
        }
        if !(self.widths.extra_column > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "widths.extra_column must be positive, got {}",
                self.widths.extra_column
            )));
        }

        check_column_names(&self.extra_columns)
    }
}

/// Reject blank extra column names, wherever they came from
pub fn check_column_names(columns: &[String]) -> Result<(), ConfigError> {
    match columns.iter().find(|c| c.trim().is_empty()) {
        Some(column) => Err(ConfigError::Invalid(format!(
            "extra column name is blank: {:?}",
            column
        ))),
        None => Ok(()),
    }
}

/// Fonts and colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub font_name: String,
    pub font_size: f64,
    /// Header background as `RRGGBB`, optionally prefixed with `#`
    pub header_fill: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 16.0,
            header_fill: "99CCFF".to_string(),
        }
    }
}

impl StyleConfig {
    /// Header fill as a packed RGB value
    pub fn header_fill_rgb(&self) -> Result<u32, ConfigError> {
        let hex = self.header_fill.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ConfigError::Invalid(format!(
                "style.header_fill must be RRGGBB, got '{}'",
                self.header_fill
            )));
        }
        u32::from_str_radix(hex, 16).map_err(|_| {
            ConfigError::Invalid(format!(
                "style.header_fill is not a hex colour: '{}'",
                self.header_fill
            ))
        })
    }
}

/// Fixed column widths, in character units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidthConfig {
    pub progress: Vec<f64>,
    pub requirement: Vec<f64>,
    /// Width of every column past the requirement profile (extra columns)
    pub extra_column: f64,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            progress: vec![60.0, 60.0, 20.0, 15.0, 15.0, 15.0, 15.0],
            requirement: vec![50.0, 20.0, 100.0, 10.0, 20.0, 50.0],
            extra_column: 50.0,
        }
    }
}
