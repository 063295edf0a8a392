//! controlsheet-core: turn security-control catalogs into XLSX checklists
//!
//! A catalog (requirements → categories → items) becomes one worksheet per
//! requirement, plus a "Progress Report" sheet whose status counts are live
//! `COUNTIF` formulas over the requirement sheets.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod progress;
pub mod reference;
pub mod writer;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub use builder::ReportBuilder;
pub use catalog::{Catalog, Category, Item, Requirement};
pub use config::ReportConfig;
pub use error::{CatalogError, ConfigError, Error, ReportError, Result};
pub use format::SheetFormatter;
pub use layout::{CellValue, ReportLayout, SheetKind, SheetLayout};

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// False for a dry run
    pub written: bool,
    pub catalog: String,
    pub version: String,
    pub total_items: usize,
    pub sheets: Vec<SheetSummary>,
}

/// Row statistics for one generated sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    /// Rows including the header
    pub rows: usize,
    /// Progress rows for the progress sheet, categories for requirement sheets
    pub groups: usize,
}

/// Main generator interface
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a generator with default configuration
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Extra columns from the config followed by `extra_columns`
    pub fn columns_for(&self, extra_columns: &[String]) -> Vec<String> {
        self.config
            .extra_columns
            .iter()
            .chain(extra_columns)
            .cloned()
            .collect()
    }

    /// Lay out the workbook for `catalog` without writing anything
    pub fn plan(&self, catalog: &Catalog, extra_columns: &[String]) -> Result<ReportLayout> {
        let columns = self.columns_for(extra_columns);
        config::check_column_names(&columns)?;
        let builder = ReportBuilder::new(columns);
        Ok(builder.build(catalog)?)
    }

    /// Load `input`, build the report and save it. The output defaults to
    /// `<ShortName>-<Version>.xlsx` in the working directory.
    pub fn generate_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        extra_columns: &[String],
    ) -> Result<GenerationSummary> {
        self.run(input, output, extra_columns, true)
    }

    /// Same as [`generate_file`](Self::generate_file) but stops before saving
    pub fn dry_run(
        &self,
        input: &Path,
        output: Option<&Path>,
        extra_columns: &[String],
    ) -> Result<GenerationSummary> {
        self.run(input, output, extra_columns, false)
    }

    fn run(
        &self,
        input: &Path,
        output: Option<&Path>,
        extra_columns: &[String],
        write: bool,
    ) -> Result<GenerationSummary> {
        self.config.validate()?;
        let formatter = SheetFormatter::new(&self.config)?;

        let catalog = Catalog::from_file(input)?;
        let layout = self.plan(&catalog, extra_columns)?;

        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(catalog.default_file_name()));

        if write {
            writer::save_report(&layout, &formatter, &output)?;
        } else {
            info!(path = %output.display(), "dry run, report not written");
        }

        Ok(summarize(input, &output, write, &catalog, &layout))
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(
    input: &Path,
    output: &Path,
    written: bool,
    catalog: &Catalog,
    layout: &ReportLayout,
) -> GenerationSummary {
    // Requirement sheets follow the catalog order
    let mut categories = catalog.requirements.iter().map(|r| r.categories.len());

    let sheets = layout
        .sheets
        .iter()
        .map(|sheet| {
            let groups = match sheet.kind {
                SheetKind::Progress => sheet.rows.len(),
                SheetKind::Requirement => categories.next().unwrap_or(0),
            };
            SheetSummary {
                name: sheet.name.clone(),
                rows: sheet.row_count(),
                groups,
            }
        })
        .collect();

    GenerationSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        written,
        catalog: catalog.short_name.clone(),
        version: catalog.version.clone(),
        total_items: catalog.total_items(),
        sheets,
    }
}
