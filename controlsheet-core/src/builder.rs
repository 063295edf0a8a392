//! Report builder: turns a catalog into a workbook layout
//!
//! One sheet is produced per requirement, one row per checklist item, and a
//! progress sheet (placed first) with live status counts per subcategory.

use crate::catalog::{Catalog, Requirement};
use crate::error::ReportError;
use crate::layout::{
    CellValue, ListValidation, PROGRESS_SHEET_NAME, ReportLayout, STATUS_COLUMN, STATUS_VALUES,
    SheetKind, SheetLayout,
};
use crate::progress::ProgressTracker;
use crate::reference::CellReference;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Fixed leading columns of every requirement sheet
pub const REQUIREMENT_COLUMNS: [&str; 6] =
    ["Category", "#", "Description", "Level", "Status", "Comments"];

/// Longest sheet name spreadsheet applications accept
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Rows available in a worksheet
pub const MAX_ROWS: usize = 1_048_576;

/// Zero-based column of the first status count on the progress sheet (column D)
const FIRST_COUNT_COLUMN: u16 = 3;

static FORBIDDEN_SHEET_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]:*?/\\]").expect("valid sheet name pattern"));

/// Make a title usable as a sheet name: forbidden characters become `_`, the
/// name is cut to 31 characters and may not start or end with an apostrophe.
pub fn normalize_sheet_name(title: &str) -> String {
    let replaced = FORBIDDEN_SHEET_CHARS.replace_all(title, "_");
    let truncated: String = replaced.chars().take(MAX_SHEET_NAME_LEN).collect();
    truncated.trim_matches('\'').to_string()
}

/// Header of the progress sheet; the status columns hold the literal status
/// values so the count formulas can use them as criteria.
pub fn progress_header() -> Vec<String> {
    let mut header = vec![
        "Category".to_string(),
        "Subcategory".to_string(),
        "Total Checks".to_string(),
    ];
    header.extend(STATUS_VALUES.iter().map(|s| s.to_string()));
    header.push("Progress".to_string());
    header
}

/// Builds the workbook layout for a catalog
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    extra_columns: Vec<String>,
}

impl ReportBuilder {
    /// Create a builder that appends `extra_columns` after "Comments"
    pub fn new(extra_columns: Vec<String>) -> Self {
        Self { extra_columns }
    }

    /// Header row of a requirement sheet
    pub fn requirement_header(&self) -> Vec<String> {
        REQUIREMENT_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Lay out the whole workbook: progress sheet first, then one sheet per
    /// requirement in document order.
    pub fn build(&self, catalog: &Catalog) -> Result<ReportLayout, ReportError> {
        let mut tracker = ProgressTracker::new();
        let mut sheets = Vec::with_capacity(catalog.requirements.len() + 1);

        // Spreadsheet applications compare sheet names case-insensitively
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(PROGRESS_SHEET_NAME.to_lowercase());

        for requirement in &catalog.requirements {
            let name = normalize_sheet_name(&requirement.sheet_title());
            if name.is_empty() {
                return Err(ReportError::EmptySheetName {
                    requirement: requirement.shortcode.clone(),
                });
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ReportError::DuplicateSheet {
                    name,
                    requirement: requirement.shortcode.clone(),
                });
            }

            let sheet = self.build_requirement_sheet(name, requirement, &mut tracker)?;
            debug!(
                sheet = %sheet.name,
                rows = sheet.row_count(),
                subcategories = tracker.subcategory_count(&sheet.name),
                "built requirement sheet"
            );
            sheets.push(sheet);
        }

        let progress = build_progress_sheet(&tracker);
        debug!(rows = progress.row_count(), "built progress sheet");
        sheets.insert(0, progress);

        Ok(ReportLayout { sheets })
    }

    fn build_requirement_sheet(
        &self,
        name: String,
        requirement: &Requirement,
        tracker: &mut ProgressTracker,
    ) -> Result<SheetLayout, ReportError> {
        if requirement.item_count() + 1 > MAX_ROWS {
            return Err(ReportError::TooManyRows { sheet: name });
        }

        let mut sheet = SheetLayout::new(name, SheetKind::Requirement, self.requirement_header());
        tracker.start_sheet(&sheet.name);

        for category in &requirement.categories {
            // Bounded by the MAX_ROWS check above
            let count = category.items.len() as u32;
            tracker.record(&sheet.name, category.progress_label(), count)?;

            for item in &category.items {
                let row = sheet.push_row(vec![
                    CellValue::text(&category.name),
                    CellValue::text(&item.shortcode),
                    CellValue::text(&item.description),
                    CellValue::Number(item.level),
                    CellValue::Blank,
                    CellValue::Blank,
                ]);
                sheet
                    .validations
                    .push(ListValidation::status(CellReference::new(row, STATUS_COLUMN)));
            }
        }

        Ok(sheet)
    }
}

/// Lay out the progress sheet from the recorded subcategory spans
pub fn build_progress_sheet(tracker: &ProgressTracker) -> SheetLayout {
    let mut sheet = SheetLayout::new(PROGRESS_SHEET_NAME, SheetKind::Progress, progress_header());

    for (sheet_name, label, entry) in tracker.iter() {
        let mut row = vec![
            CellValue::text(sheet_name),
            CellValue::text(label),
            CellValue::Number(i64::from(entry.count)),
        ];
        for i in 0..STATUS_VALUES.len() as u16 {
            let criteria = CellReference::new(0, FIRST_COUNT_COLUMN + i);
            row.push(entry.status_count(sheet_name, criteria));
        }
        row.push(CellValue::Blank);
        sheet.push_row(row);
    }

    sheet
}
