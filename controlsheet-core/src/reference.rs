//! A1-style cell references and sheet-qualified ranges used in formulas

use std::cmp::Ordering;
use std::fmt;

/// Zero-based cell position (e.g., row 0 col 0 is "A1")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub row: u32,
    pub col: u16,
}

impl CellReference {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Convert to Excel-style reference (e.g., "A1")
    pub fn to_excel_ref(&self) -> String {
        format!("{}{}", col_to_letter(self.col), self.row + 1)
    }

    /// Reference with both row and column fixed (e.g., "$D$1")
    pub fn to_absolute_ref(&self) -> String {
        format!("${}${}", col_to_letter(self.col), self.row + 1)
    }

    /// Reference with only the row fixed (e.g., "E$2")
    pub fn to_row_absolute_ref(&self) -> String {
        format!("{}${}", col_to_letter(self.col), self.row + 1)
    }

    /// Parse a reference like "E12" (dollar signs allowed)
    pub fn parse(cell_ref: &str) -> Option<Self> {
        let mut col = 0u32;
        let mut row_str = String::new();

        for ch in cell_ref.chars() {
            if ch == '$' {
                continue;
            } else if ch.is_ascii_alphabetic() && row_str.is_empty() {
                let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
                col = col.checked_mul(26)?.checked_add(digit)?;
            } else if ch.is_ascii_digit() {
                row_str.push(ch);
            } else {
                return None;
            }
        }

        let row = row_str.parse::<u32>().ok()?;
        if col == 0 || row == 0 {
            return None;
        }

        Some(Self {
            row: row - 1,
            col: u16::try_from(col - 1).ok()?,
        })
    }
}

/// Convert column number to letter (0 -> A, 1 -> B, 26 -> AA, etc.)
pub fn col_to_letter(col: u16) -> String {
    let mut col = u32::from(col);
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

/// Quote a sheet name for use in a formula, doubling embedded apostrophes
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Single-column range on another sheet with row-absolute bounds,
/// e.g. `'V1 - Encoding'!E$2:E$4`
pub fn sheet_column_range(sheet: &str, col: u16, first_row: u32, last_row: u32) -> String {
    format!(
        "{}!{}:{}",
        quote_sheet_name(sheet),
        CellReference::new(first_row, col).to_row_absolute_ref(),
        CellReference::new(last_row, col).to_row_absolute_ref()
    )
}

impl PartialOrd for CellReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row.cmp(&other.row).then_with(|| self.col.cmp(&other.col))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_excel_ref())
    }
}
