//! Catalog document model and loader
//!
//! A catalog is a three-level tree: requirements hold categories, categories
//! hold checklist items. Records are read with typed deserialization one level
//! at a time so a malformed record can be reported by its position.

use crate::error::{CatalogError, RecordLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Root document describing a control standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub short_name: String,
    pub version: String,
    /// Long name of the standard, when the document carries one
    pub name: Option<String>,
    pub description: Option<String>,
    pub requirements: Vec<Requirement>,
}

/// Top-level grouping, rendered as one worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub shortcode: String,
    pub name: String,
    pub categories: Vec<Category>,
}

/// Grouping of items inside a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub shortcode: String,
    pub name: String,
    pub items: Vec<Item>,
}

/// Single checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub shortcode: String,
    pub description: String,
    pub level: i64,
}

impl Catalog {
    /// Load and parse a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&content, path)?;

        info!(
            path = %path.display(),
            short_name = %catalog.short_name,
            version = %catalog.version,
            name = catalog.name.as_deref().unwrap_or("-"),
            description = catalog.description.as_deref().unwrap_or("-"),
            requirements = catalog.requirements.len(),
            items = catalog.total_items(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text that did not come from a file
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        Self::parse(content, Path::new("<memory>"))
    }

    fn parse(content: &str, origin: &Path) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(content).map_err(|source| CatalogError::Parse {
            path: PathBuf::from(origin),
            source,
        })?;
        Self::from_value(&value)
    }

    /// Build a catalog from an already parsed JSON value
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let raw = RawCatalog::deserialize(value).map_err(|source| CatalogError::Structure {
            location: RecordLocation::root(),
            source,
        })?;

        let requirements = raw
            .requirements
            .iter()
            .enumerate()
            .map(|(index, value)| read_requirement(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            short_name: raw.short_name,
            version: raw.version,
            name: raw.name,
            description: raw.description,
            requirements,
        })
    }

    /// Default output file name: `<ShortName>-<Version>.xlsx`
    pub fn default_file_name(&self) -> String {
        format!("{}-{}.xlsx", self.short_name, self.version)
    }

    /// Number of checklist items across all requirements
    pub fn total_items(&self) -> usize {
        self.requirements.iter().map(Requirement::item_count).sum()
    }
}

impl Requirement {
    /// Title used for the requirement's worksheet, before normalisation
    pub fn sheet_title(&self) -> String {
        format!("{} - {}", self.shortcode, self.name)
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

impl Category {
    /// Label of the category's row in the progress report
    pub fn progress_label(&self) -> String {
        format!("{}: {}", self.shortcode, self.name)
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(rename = "ShortName")]
    short_name: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Requirements")]
    requirements: Vec<Value>,
}

/// Shape shared by requirements and categories
#[derive(Deserialize)]
struct RawGroup {
    #[serde(rename = "Shortcode")]
    shortcode: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Items")]
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(rename = "Shortcode")]
    shortcode: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "L")]
    level: Value,
}

fn shortcode_of(value: &Value) -> Option<&str> {
    value.get("Shortcode").and_then(Value::as_str)
}

fn read_requirement(index: usize, value: &Value) -> Result<Requirement, CatalogError> {
    let location = RecordLocation::requirement(index, shortcode_of(value));
    let raw = RawGroup::deserialize(value).map_err(|source| CatalogError::Structure {
        location: location.clone(),
        source,
    })?;

    let categories = raw
        .items
        .iter()
        .enumerate()
        .map(|(index, value)| read_category(&location, index, value))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(requirement = %raw.shortcode, categories = categories.len(), "read requirement");

    Ok(Requirement {
        shortcode: raw.shortcode,
        name: raw.name,
        categories,
    })
}

fn read_category(
    parent: &RecordLocation,
    index: usize,
    value: &Value,
) -> Result<Category, CatalogError> {
    let location = parent.category(index, shortcode_of(value));
    let raw = RawGroup::deserialize(value).map_err(|source| CatalogError::Structure {
        location: location.clone(),
        source,
    })?;

    let items = raw
        .items
        .iter()
        .enumerate()
        .map(|(index, value)| read_item(&location, index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Category {
        shortcode: raw.shortcode,
        name: raw.name,
        items,
    })
}

fn read_item(parent: &RecordLocation, index: usize, value: &Value) -> Result<Item, CatalogError> {
    let location = parent.item(index, shortcode_of(value));
    let raw = RawItem::deserialize(value).map_err(|source| CatalogError::Structure {
        location: location.clone(),
        source,
    })?;

    let level = parse_level(&raw.level).ok_or_else(|| CatalogError::Level {
        location,
        value: raw.level.to_string(),
    })?;

    Ok(Item {
        shortcode: raw.shortcode,
        description: raw.description,
        level,
    })
}

/// Interpret a level value as an integer.
///
/// Accepts JSON integers, floats without a fractional part and strings holding
/// an integer (surrounding whitespace ignored).
fn parse_level(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Name": "Application Security Verification Standard",
            "Description": "Security requirements for web applications",
            "ShortName": "ASVS",
            "Version": "5.0.0",
            "Requirements": [
                {
                    "Shortcode": "V1",
                    "Ordinal": 1,
                    "Name": "Encoding and Sanitization",
                    "Items": [
                        {
                            "Shortcode": "V1.1",
                            "Name": "Encoding and Sanitization Architecture",
                            "Items": [
                                {"Shortcode": "V1.1.1", "Description": "Decode input once.", "L": "2"},
                                {"Shortcode": "V1.1.2", "Description": "Encode output late.", "L": 2}
                            ]
                        },
                        {
                            "Shortcode": "V1.2",
                            "Name": "Injection Prevention",
                            "Items": [
                                {"Shortcode": "V1.2.1", "Description": "Escape HTML.", "L": 1.0}
                            ]
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_typed_catalog() {
        let catalog = Catalog::from_value(&sample()).unwrap();

        assert_eq!(catalog.short_name, "ASVS");
        assert_eq!(catalog.version, "5.0.0");
        assert_eq!(
            catalog.name.as_deref(),
            Some("Application Security Verification Standard")
        );
        assert_eq!(
            catalog.description.as_deref(),
            Some("Security requirements for web applications")
        );
        assert_eq!(catalog.requirements.len(), 1);

        let requirement = &catalog.requirements[0];
        assert_eq!(requirement.sheet_title(), "V1 - Encoding and Sanitization");
        assert_eq!(requirement.item_count(), 3);
        assert_eq!(
            requirement.categories[1].progress_label(),
            "V1.2: Injection Prevention"
        );

        let levels: Vec<i64> = requirement
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.level))
            .collect();
        assert_eq!(levels, vec![2, 2, 1]);
        assert_eq!(catalog.total_items(), 3);
    }

    #[test]
    fn test_default_file_name() {
        let catalog = Catalog::from_value(&sample()).unwrap();
        assert_eq!(catalog.default_file_name(), "ASVS-5.0.0.xlsx");
    }

    #[test]
    fn test_order_is_preserved() {
        let catalog = Catalog::from_value(&sample()).unwrap();
        let codes: Vec<&str> = catalog.requirements[0]
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.shortcode.as_str()))
            .collect();
        assert_eq!(codes, vec!["V1.1.1", "V1.1.2", "V1.2.1"]);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(&json!(3)), Some(3));
        assert_eq!(parse_level(&json!(" 1 ")), Some(1));
        assert_eq!(parse_level(&json!(2.0)), Some(2));
        assert_eq!(parse_level(&json!(2.5)), None);
        assert_eq!(parse_level(&json!("L1")), None);
        assert_eq!(parse_level(&json!(true)), None);
        assert_eq!(parse_level(&Value::Null), None);
    }

    #[test]
    fn test_bad_level_reports_location() {
        let mut doc = sample();
        doc["Requirements"][0]["Items"][1]["Items"][0]["L"] = json!("high");

        let err = Catalog::from_value(&doc).unwrap_err();
        match &err {
            CatalogError::Level { location, value } => {
                assert_eq!(value, "\"high\"");
                assert_eq!(
                    location.to_string(),
                    "requirement #1 (V1) > category #2 (V1.2) > item #1 (V1.2.1)"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_reports_location() {
        let mut doc = sample();
        doc["Requirements"][0]["Items"][0]["Items"][1]
            .as_object_mut()
            .unwrap()
            .remove("Description");

        let err = Catalog::from_value(&doc).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, CatalogError::Structure { .. }));
        assert!(message.contains("category #1 (V1.1) > item #2 (V1.1.2)"));
        assert!(message.contains("Description"));
    }

    #[test]
    fn test_missing_root_field() {
        let err = Catalog::from_value(&json!({"ShortName": "ASVS", "Requirements": []}))
            .unwrap_err();
        assert!(err.to_string().contains("catalog root"));
        assert!(err.to_string().contains("Version"));
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
