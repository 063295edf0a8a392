//! In-memory workbook layout produced by the report builder
//!
//! The layout holds every sheet, row and validation target in final order and
//! knows nothing about the xlsx library that eventually renders it.

use crate::reference::CellReference;

/// Values allowed in the Status column
pub const STATUS_VALUES: [&str; 3] = ["ToDo", "Done", "NA"];

/// Name of the aggregate sheet
pub const PROGRESS_SHEET_NAME: &str = "Progress Report";

/// Zero-based index of the Status column on requirement sheets (column E)
pub const STATUS_COLUMN: u16 = 4;

/// Which width profile a sheet uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Progress,
    Requirement,
}

/// Content of a single cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(i64),
    /// Formula text including the leading `=`
    Formula(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

/// List-of-values constraint attached to one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValidation {
    pub cell: CellReference,
    pub values: Vec<String>,
    pub allow_blank: bool,
}

impl ListValidation {
    pub fn status(cell: CellReference) -> Self {
        Self {
            cell,
            values: STATUS_VALUES.iter().map(|s| s.to_string()).collect(),
            allow_blank: true,
        }
    }
}

/// One worksheet: a header row followed by data rows
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub kind: SheetKind,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub validations: Vec<ListValidation>,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>, kind: SheetKind, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            header,
            rows: Vec::new(),
            validations: Vec::new(),
        }
    }

    /// Number of columns, as defined by the header
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of rows including the header
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Append a data row, padding with blanks up to the header width.
    /// Returns the zero-based sheet row the data landed on.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) -> u32 {
        if row.len() < self.width() {
            row.resize(self.width(), CellValue::Blank);
        }
        self.rows.push(row);
        // The header occupies row 0
        self.rows.len() as u32
    }

    /// Cell at a zero-based sheet position; row 0 is the header
    pub fn cell(&self, row: u32, col: u16) -> Option<CellValue> {
        let col = usize::from(col);
        if row == 0 {
            return self.header.get(col).cloned().map(CellValue::Text);
        }
        self.rows.get(row as usize - 1)?.get(col).cloned()
    }
}

/// Complete workbook in sheet order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub sheets: Vec<SheetLayout>,
}

impl ReportLayout {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn requirement_sheets(&self) -> impl Iterator<Item = &SheetLayout> {
        self.sheets.iter().filter(|s| s.kind == SheetKind::Requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_to_header() {
        let mut sheet = SheetLayout::new(
            "V1 - Test",
            SheetKind::Requirement,
            vec!["A".into(), "B".into(), "C".into()],
        );
        let row = sheet.push_row(vec![CellValue::text("x")]);

        assert_eq!(row, 1);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[0].len(), 3);
        assert!(sheet.rows[0][1].is_blank());
        assert!(sheet.rows[0][2].is_blank());
    }

    #[test]
    fn test_cell_lookup() {
        let mut sheet = SheetLayout::new("S", SheetKind::Progress, vec!["H".into()]);
        sheet.push_row(vec![CellValue::Number(3)]);

        assert_eq!(sheet.cell(0, 0), Some(CellValue::text("H")));
        assert_eq!(sheet.cell(1, 0), Some(CellValue::Number(3)));
        assert_eq!(sheet.cell(2, 0), None);
        assert_eq!(sheet.cell(0, 1), None);
    }

    #[test]
    fn test_status_validation() {
        let validation = ListValidation::status(CellReference::new(1, STATUS_COLUMN));
        assert_eq!(validation.values, vec!["ToDo", "Done", "NA"]);
        assert!(validation.allow_blank);
        assert_eq!(validation.cell.to_excel_ref(), "E2");
    }
}
