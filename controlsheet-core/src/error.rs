//! Error types for catalog loading, report building and configuration

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Position of a record inside the catalog, used to point at bad input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordLocation {
    pub requirement: Option<(usize, Option<String>)>,
    pub category: Option<(usize, Option<String>)>,
    pub item: Option<(usize, Option<String>)>,
}

impl RecordLocation {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn requirement(index: usize, shortcode: Option<&str>) -> Self {
        Self {
            requirement: Some((index, shortcode.map(str::to_string))),
            ..Self::default()
        }
    }

    pub fn category(&self, index: usize, shortcode: Option<&str>) -> Self {
        Self {
            category: Some((index, shortcode.map(str::to_string))),
            item: None,
            ..self.clone()
        }
    }

    pub fn item(&self, index: usize, shortcode: Option<&str>) -> Self {
        Self {
            item: Some((index, shortcode.map(str::to_string))),
            ..self.clone()
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("requirement", &self.requirement),
            ("category", &self.category),
            ("item", &self.item),
        ];

        let mut wrote = false;
        for (kind, part) in parts {
            let Some((index, shortcode)) = part else {
                continue;
            };
            if wrote {
                write!(f, " > ")?;
            }
            // Indices are shown 1-based to match how people count records
            write!(f, "{} #{}", kind, index + 1)?;
            if let Some(code) = shortcode {
                write!(f, " ({})", code)?;
            }
            wrote = true;
        }

        if !wrote {
            write!(f, "catalog root")?;
        }
        Ok(())
    }
}

/// Errors raised while reading a catalog document
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed record at {location}: {source}")]
    Structure {
        location: RecordLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("level at {location} is not an integer: {value}")]
    Level {
        location: RecordLocation,
        value: String,
    },
}

/// Errors raised while laying out or writing the report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("duplicate sheet name '{name}' (from requirement {requirement})")]
    DuplicateSheet { name: String, requirement: String },

    #[error("duplicate subcategory '{label}' in sheet '{sheet}'")]
    DuplicateSubcategory { sheet: String, label: String },

    #[error("requirement '{requirement}' produces an empty sheet name")]
    EmptySheetName { requirement: String },

    #[error("sheet '{sheet}' exceeds the worksheet row limit")]
    TooManyRows { sheet: String },

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("unable to save report to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration error: {0}")]
    Invalid(String),
}

/// Any error produced by the library
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(RecordLocation::root().to_string(), "catalog root");

        let loc = RecordLocation::requirement(1, Some("V2"))
            .category(0, Some("V2.1"))
            .item(2, None);
        assert_eq!(
            loc.to_string(),
            "requirement #2 (V2) > category #1 (V2.1) > item #3"
        );
    }

    #[test]
    fn test_category_resets_item() {
        let loc = RecordLocation::requirement(0, None)
            .category(0, None)
            .item(4, Some("V1.1.5"))
            .category(1, None);
        assert!(loc.item.is_none());
        assert_eq!(loc.to_string(), "requirement #1 > category #2");
    }
}
