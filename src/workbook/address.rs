//! A1-style cell addressing
//!
//! Rows and columns are zero-based everywhere in the model; conversion to the
//! one-based A1 notation happens only when an address is rendered.

use crate::error::{CodesheetError, CodesheetResult};
use std::fmt;

/// Number of columns addressable in an .xlsx worksheet (A..XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// Number of rows addressable in an .xlsx worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Convert a zero-based column index to its column letters
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
/// - 16383 → XFD
pub fn column_index_to_letter(index: u16) -> String {
    let mut result = String::new();
    let mut idx = index as u32;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Convert column letters (case-insensitive) back to a zero-based index
pub fn column_letter_to_index(letters: &str) -> CodesheetResult<u16> {
    if letters.is_empty() {
        return Err(CodesheetError::InvalidAddress(
            "empty column identifier".to_string(),
        ));
    }

    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(CodesheetError::InvalidAddress(format!(
                "'{}' is not a column identifier",
                letters
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index * 26 + digit;
        if index > MAX_COLUMNS {
            return Err(CodesheetError::ColumnSpaceExhausted {
                requested: index as usize - 1,
                max: MAX_COLUMNS,
            });
        }
    }

    Ok((index - 1) as u16)
}

/// Narrow a computed column position to an addressable column index
pub fn checked_column(index: usize) -> CodesheetResult<u16> {
    if index >= MAX_COLUMNS as usize {
        return Err(CodesheetError::ColumnSpaceExhausted {
            requested: index,
            max: MAX_COLUMNS,
        });
    }
    Ok(index as u16)
}

/// A single cell position (zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse an A1 reference such as `D2` or `$D$2`
    pub fn parse(address: &str) -> CodesheetResult<Self> {
        let cleaned: String = address.chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| CodesheetError::InvalidAddress(address.to_string()))?;
        let (letters, digits) = cleaned.split_at(split);

        let col = column_letter_to_index(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| CodesheetError::InvalidAddress(address.to_string()))?;
        if row == 0 || row > MAX_ROWS {
            return Err(CodesheetError::InvalidAddress(address.to_string()));
        }

        Ok(Self { row: row - 1, col })
    }

    /// Render as an absolute reference (`$D$2`)
    pub fn to_absolute(&self) -> String {
        format!("${}${}", column_index_to_letter(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letter(self.col), self.row + 1)
    }
}

/// A rectangular block of cells, bounds inclusive
///
/// `first.row > last.row` is allowed and describes a range with no rows; it
/// arises for a reference sheet that has a header but no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    pub fn new(first: CellRef, last: CellRef) -> Self {
        Self { first, last }
    }

    pub fn single(cell: CellRef) -> Self {
        Self {
            first: cell,
            last: cell,
        }
    }

    /// Rows `first_row..=last_row` of one column
    pub fn column_span(col: u16, first_row: u32, last_row: u32) -> Self {
        Self {
            first: CellRef::new(first_row, col),
            last: CellRef::new(last_row, col),
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.first == self.last
    }

    /// Number of rows covered; zero for an inverted range
    pub fn row_count(&self) -> u32 {
        if self.last.row < self.first.row {
            0
        } else {
            self.last.row - self.first.row + 1
        }
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.first.row
            && cell.row <= self.last.row
            && cell.col >= self.first.col
            && cell.col <= self.last.col
    }

    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.first.row..=self.last.row).flat_map(move |row| {
            (self.first.col..=self.last.col).map(move |col| CellRef::new(row, col))
        })
    }

    /// Render as an absolute range (`$A$2:$A$4`)
    pub fn to_absolute(&self) -> String {
        format!("{}:{}", self.first.to_absolute(), self.last.to_absolute())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

/// Quote a sheet name for use in a formula (`'My Sheet'`)
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(701), "ZZ");
        assert_eq!(column_index_to_letter(702), "AAA");
        assert_eq!(column_index_to_letter(16_383), "XFD");
    }

    #[test]
    fn test_column_letter_to_index() {
        assert_eq!(column_letter_to_index("A").unwrap(), 0);
        assert_eq!(column_letter_to_index("d").unwrap(), 3);
        assert_eq!(column_letter_to_index("AA").unwrap(), 26);
        assert_eq!(column_letter_to_index("XFD").unwrap(), 16_383);
        assert!(column_letter_to_index("").is_err());
        assert!(column_letter_to_index("A1").is_err());
        assert!(matches!(
            column_letter_to_index("XFE"),
            Err(CodesheetError::ColumnSpaceExhausted { .. })
        ));
    }

    #[test]
    fn test_letters_and_indices_agree_past_single_letters() {
        for idx in [0u16, 25, 26, 51, 52, 675, 676, 701, 702, 16_383] {
            let letters = column_index_to_letter(idx);
            assert_eq!(column_letter_to_index(&letters).unwrap(), idx, "{}", letters);
        }
    }

    #[test]
    fn test_checked_column_limit() {
        assert_eq!(checked_column(16_383).unwrap(), 16_383);
        assert!(matches!(
            checked_column(16_384),
            Err(CodesheetError::ColumnSpaceExhausted {
                requested: 16_384,
                max: 16_384
            })
        ));
    }

    #[test]
    fn test_cell_ref_parse_and_display() {
        let cell = CellRef::parse("$D$2").unwrap();
        assert_eq!(cell, CellRef::new(1, 3));
        assert_eq!(cell.to_string(), "D2");
        assert_eq!(cell.to_absolute(), "$D$2");
        assert_eq!(CellRef::parse("ab10").unwrap(), CellRef::new(9, 27));
        assert!(CellRef::parse("D0").is_err());
        assert!(CellRef::parse("12").is_err());
        assert!(CellRef::parse("D").is_err());
    }

    #[test]
    fn test_range_display_and_rows() {
        let col = CellRange::column_span(3, 1, 2);
        assert_eq!(col.to_string(), "D2:D3");
        assert_eq!(col.row_count(), 2);
        assert!(col.contains(CellRef::new(2, 3)));
        assert!(!col.contains(CellRef::new(0, 3)));

        let single = CellRange::single(CellRef::new(1, 1));
        assert_eq!(single.to_string(), "B2");
        assert_eq!(single.cells().count(), 1);
    }

    #[test]
    fn test_inverted_range_has_no_rows() {
        let empty = CellRange::column_span(0, 1, 0);
        assert_eq!(empty.row_count(), 0);
        assert_eq!(empty.cells().count(), 0);
        assert_eq!(empty.to_absolute(), "$A$2:$A$1");
        assert!(!empty.contains(CellRef::new(0, 0)));
        assert!(!empty.contains(CellRef::new(1, 0)));
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Intensity_P1"), "'Intensity_P1'");
        assert_eq!(quote_sheet_name("Rater's view"), "'Rater''s view'");
    }
}
