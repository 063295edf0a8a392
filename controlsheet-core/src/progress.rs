//! Per-subcategory row bookkeeping for the progress report
//!
//! While a requirement sheet is built, every category records how many rows it
//! contributes. Categories are laid out contiguously after the header, so the
//! first row of a category is the running total of earlier categories plus the
//! header offset.

use crate::error::ReportError;
use crate::layout::{CellValue, STATUS_COLUMN};
use crate::reference::{CellReference, sheet_column_range};
use indexmap::IndexMap;
use indexmap::map::Entry;

/// First data row (1-based) on a requirement sheet; row 1 is the header
pub const FIRST_DATA_ROW: u32 = 2;

/// Row span of one subcategory on its requirement sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEntry {
    /// 1-based row of the first item
    pub start_row: u32,
    pub count: u32,
}

impl ProgressEntry {
    /// 1-based row of the last item; only meaningful when `count > 0`
    pub fn end_row(&self) -> u32 {
        self.start_row + self.count.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Value for a status-count cell: a live COUNTIF over the Status column of
    /// `sheet`, matching the text held in `criteria` (a header cell of the
    /// progress sheet). Empty subcategories have nothing to count.
    pub fn status_count(&self, sheet: &str, criteria: CellReference) -> CellValue {
        if self.is_empty() {
            return CellValue::Number(0);
        }
        CellValue::Formula(format!(
            "=COUNTIF({},{})",
            sheet_column_range(sheet, STATUS_COLUMN, self.start_row - 1, self.end_row() - 1),
            criteria.to_absolute_ref()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetProgress {
    next_row: u32,
    entries: IndexMap<String, ProgressEntry>,
}

impl Default for SheetProgress {
    fn default() -> Self {
        Self {
            next_row: FIRST_DATA_ROW,
            entries: IndexMap::new(),
        }
    }
}

/// Ordered map of sheet name to subcategory label to row span
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    sheets: IndexMap<String, SheetProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet so it keeps its position even if it has no categories
    pub fn start_sheet(&mut self, sheet: &str) {
        self.sheets.entry(sheet.to_string()).or_default();
    }

    /// Record the next subcategory block of `sheet`
    pub fn record(
        &mut self,
        sheet: &str,
        label: impl Into<String>,
        count: u32,
    ) -> Result<ProgressEntry, ReportError> {
        let progress = self.sheets.entry(sheet.to_string()).or_default();
        let entry = ProgressEntry {
            start_row: progress.next_row,
            count,
        };

        match progress.entries.entry(label.into()) {
            Entry::Occupied(occupied) => {
                return Err(ReportError::DuplicateSubcategory {
                    sheet: sheet.to_string(),
                    label: occupied.key().clone(),
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }

        progress.next_row += count;
        Ok(entry)
    }

    /// Iterate `(sheet, subcategory, entry)` in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &ProgressEntry)> {
        self.sheets.iter().flat_map(|(sheet, progress)| {
            progress
                .entries
                .iter()
                .map(move |(label, entry)| (sheet.as_str(), label.as_str(), entry))
        })
    }

    /// Number of subcategories recorded for one sheet
    pub fn subcategory_count(&self, sheet: &str) -> usize {
        self.sheets.get(sheet).map_or(0, |p| p.entries.len())
    }
}
