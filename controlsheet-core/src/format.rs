//! Presentation post-pass: fonts, borders, fills and column widths
//!
//! Runs after every cell has been written and only touches formatting; values
//! and formulas are left as they are.

use crate::config::ReportConfig;
use crate::error::{ConfigError, ReportError};
use crate::layout::{SheetKind, SheetLayout};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Worksheet};

/// Applies the uniform look to rendered sheets
#[derive(Debug, Clone)]
pub struct SheetFormatter {
    header: Format,
    body: Format,
    progress_widths: Vec<f64>,
    requirement_widths: Vec<f64>,
    extra_width: f64,
}

impl SheetFormatter {
    pub fn new(config: &ReportConfig) -> Result<Self, ConfigError> {
        let style = &config.style;
        let fill = style.header_fill_rgb()?;

        let body = Format::new()
            .set_font_name(&style.font_name)
            .set_font_size(style.font_size)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Left)
            .set_text_wrap();

        let header = body
            .clone()
            .set_bold()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill));

        Ok(Self {
            header,
            body,
            progress_widths: config.widths.progress.clone(),
            requirement_widths: config.widths.requirement.clone(),
            extra_width: config.widths.extra_column,
        })
    }

    /// Width of a column for a sheet of the given kind, `None` leaves the
    /// application default
    pub fn column_width(&self, kind: SheetKind, col: usize) -> Option<f64> {
        match kind {
            SheetKind::Progress => self.progress_widths.get(col).copied(),
            SheetKind::Requirement => Some(
                self.requirement_widths
                    .get(col)
                    .copied()
                    .unwrap_or(self.extra_width),
            ),
        }
    }

    /// Style every cell of `layout` already written to `worksheet` and set
    /// the column widths. Blank cells receive a formatted blank so borders
    /// cover the whole table.
    pub fn apply(&self, worksheet: &mut Worksheet, layout: &SheetLayout) -> Result<(), ReportError> {
        let width = layout.width() as u16;

        for col in 0..width {
            worksheet.set_cell_format(0, col, &self.header)?;
        }

        for (index, row) in layout.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                if cell.is_blank() {
                    worksheet.write_blank(row_num, col, &self.body)?;
                } else {
                    worksheet.set_cell_format(row_num, col, &self.body)?;
                }
            }
        }

        for col in 0..usize::from(width) {
            if let Some(w) = self.column_width(layout.kind, col) {
                worksheet.set_column_width(col as u16, w)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_profiles() {
        let formatter = SheetFormatter::new(&ReportConfig::default()).unwrap();

        let progress: Vec<Option<f64>> = (0..8)
            .map(|c| formatter.column_width(SheetKind::Progress, c))
            .collect();
        assert_eq!(
            progress,
            vec![
                Some(60.0),
                Some(60.0),
                Some(20.0),
                Some(15.0),
                Some(15.0),
                Some(15.0),
                Some(15.0),
                None
            ]
        );

        assert_eq!(formatter.column_width(SheetKind::Requirement, 2), Some(100.0));
        assert_eq!(formatter.column_width(SheetKind::Requirement, 5), Some(50.0));
        // Extra columns
        assert_eq!(formatter.column_width(SheetKind::Requirement, 6), Some(50.0));
    }

    #[test]
    fn test_custom_extra_width() {
        let mut config = ReportConfig::default();
        config.widths.extra_column = 25.0;
        let formatter = SheetFormatter::new(&config).unwrap();
        assert_eq!(formatter.column_width(SheetKind::Requirement, 7), Some(25.0));
    }
}
