//! XLSX rendering of a report layout

use crate::error::ReportError;
use crate::format::SheetFormatter;
use crate::layout::{CellValue, ListValidation, ReportLayout, SheetLayout};
use rust_xlsxwriter::{DataValidation, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

/// Render `layout` into an in-memory workbook: cells and validations first,
/// then the formatting pass over every sheet.
pub fn build_workbook(
    layout: &ReportLayout,
    formatter: &SheetFormatter,
) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();

    for sheet in &layout.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_cells(worksheet, sheet)?;
        write_validations(worksheet, sheet)?;
        debug!(sheet = %sheet.name, validations = sheet.validations.len(), "wrote sheet");
    }

    for (index, sheet) in layout.sheets.iter().enumerate() {
        let worksheet = workbook.worksheet_from_index(index)?;
        formatter.apply(worksheet, sheet)?;
    }

    Ok(workbook)
}

/// Render and save the report to `path`
pub fn save_report(
    layout: &ReportLayout,
    formatter: &SheetFormatter,
    path: &Path,
) -> Result<(), ReportError> {
    let mut workbook = build_workbook(layout, formatter)?;
    workbook.save(path).map_err(|source| ReportError::Save {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), sheets = layout.sheets.len(), "saved report");
    Ok(())
}

/// Render the report to xlsx bytes
pub fn render_to_buffer(
    layout: &ReportLayout,
    formatter: &SheetFormatter,
) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(layout, formatter)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_cells(worksheet: &mut Worksheet, sheet: &SheetLayout) -> Result<(), ReportError> {
    for (col, title) in sheet.header.iter().enumerate() {
        worksheet.write_string(0, col as u16, title)?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                // Blanks are written by the formatter
                CellValue::Blank => {}
                CellValue::Text(text) => {
                    worksheet.write_string(row_num, col, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row_num, col, *number as f64)?;
                }
                CellValue::Formula(formula) => {
                    worksheet.write_formula(row_num, col, formula.as_str())?;
                }
            }
        }
    }

    Ok(())
}

/// Each validation is attached to its own cell rather than one range over the
/// column, so rows inserted or deleted later keep their neighbours' rules.
fn write_validations(worksheet: &mut Worksheet, sheet: &SheetLayout) -> Result<(), ReportError> {
    for validation in &sheet.validations {
        let rule = list_rule(validation)?;
        let cell = validation.cell;
        worksheet.add_data_validation(cell.row, cell.col, cell.row, cell.col, &rule)?;
    }
    Ok(())
}

fn list_rule(validation: &ListValidation) -> Result<DataValidation, ReportError> {
    let values: Vec<&str> = validation.values.iter().map(String::as_str).collect();
    Ok(DataValidation::new()
        .allow_list_strings(&values)?
        .ignore_blank(validation.allow_blank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::layout::{SheetKind, STATUS_COLUMN};
    use crate::reference::CellReference;

    fn formatter() -> SheetFormatter {
        SheetFormatter::new(&ReportConfig::default()).unwrap()
    }

    #[test]
    fn test_render_to_buffer() {
        let mut sheet = SheetLayout::new(
            "V1 - Test",
            SheetKind::Requirement,
            vec!["Category".into(), "#".into(), "Description".into(), "Level".into(), "Status".into()],
        );
        let row = sheet.push_row(vec![
            CellValue::text("Area"),
            CellValue::text("V1.1.1"),
            CellValue::text("Check"),
            CellValue::Number(1),
        ]);
        sheet
            .validations
            .push(ListValidation::status(CellReference::new(row, STATUS_COLUMN)));

        let layout = ReportLayout { sheets: vec![sheet] };
        let bytes = render_to_buffer(&layout, &formatter()).unwrap();

        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let layout = ReportLayout {
            sheets: vec![SheetLayout::new("bad/name", SheetKind::Progress, vec!["A".into()])],
        };
        let err = render_to_buffer(&layout, &formatter()).unwrap_err();
        assert!(matches!(err, ReportError::Xlsx(_)));
    }

    #[test]
    fn test_save_to_missing_directory() {
        let layout = ReportLayout {
            sheets: vec![SheetLayout::new("Sheet", SheetKind::Progress, vec!["A".into()])],
        };
        let path = Path::new("/nonexistent/dir/report.xlsx");
        let err = save_report(&layout, &formatter(), path).unwrap_err();

        assert!(matches!(err, ReportError::Save { .. }));
        assert!(err.to_string().contains("/nonexistent/dir/report.xlsx"));
    }
}
