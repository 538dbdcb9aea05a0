//! In-memory workbook model
//!
//! The assembly engine writes into this model; [`crate::excel::WorkbookExporter`]
//! turns it into an .xlsx file.

pub mod address;
pub mod style;

pub use address::{
    checked_column, column_index_to_letter, column_letter_to_index, quote_sheet_name, CellRange,
    CellRef, MAX_COLUMNS, MAX_ROWS,
};
pub use style::CellStyle;

use crate::error::{CodesheetError, CodesheetResult};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// Characters Excel rejects in sheet names
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

//==============================================================================
// Cells
//==============================================================================

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Literal equality as a list validation performs it
    ///
    /// Numbers compare numerically regardless of integer/float storage; a number
    /// never matches text, so `5` and `"5"` are different entries.
    pub fn matches(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.eq_ignore_ascii_case(b),
            (CellValue::Text(_), _) | (_, CellValue::Text(_)) => false,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: Option<CellValue>,
    pub style: CellStyle,
    /// Editable even when the sheet is protected
    pub unlocked: bool,
}

impl Cell {
    /// Whether the cell carries nothing worth serializing
    pub fn is_untouched(&self) -> bool {
        self.value.is_none() && self.style.is_plain() && !self.unlocked
    }
}

//==============================================================================
// Sheet
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Sheet-level edit lock
///
/// This is the editor's soft lock, not encryption: anyone with a zip tool can
/// remove it. It only stops accidental edits inside the spreadsheet application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protection {
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSetup {
    pub orientation: Orientation,
    /// Fit the printout to (width, height) pages
    pub fit_to_pages: Option<(u16, u16)>,
}

/// A "restrict to list" data-entry rule
#[derive(Debug, Clone, PartialEq)]
pub struct ListValidation {
    /// Cells the rule applies to
    pub target: CellRange,
    /// Sheet holding the allowed values
    pub source_sheet: String,
    /// Allowed values on `source_sheet`
    pub source: CellRange,
    /// Whether a cell may be left empty
    pub allow_blank: bool,
}

impl ListValidation {
    /// List source as a formula, e.g. `'Intensity_P1'!$A$2:$A$4`
    pub fn formula(&self) -> String {
        format!(
            "{}!{}",
            quote_sheet_name(&self.source_sheet),
            self.source.to_absolute()
        )
    }

    /// Whether the rule would accept `entry` given the workbook's current source values
    pub fn accepts(&self, workbook: &Workbook, entry: Option<&CellValue>) -> bool {
        let Some(entry) = entry else {
            return self.allow_blank;
        };
        let Some(source) = workbook.sheet(&self.source_sheet) else {
            return false;
        };
        self.source
            .cells()
            .filter_map(|cell| source.value(cell))
            .any(|allowed| allowed.matches(entry))
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
    protection: Option<Protection>,
    visibility: Visibility,
    column_widths: BTreeMap<u16, f64>,
    page_setup: PageSetup,
    validations: Vec<ListValidation>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            protection: None,
            visibility: Visibility::Visible,
            column_widths: BTreeMap::new(),
            page_setup: PageSetup::default(),
            validations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a row after the last populated one; returns its zero-based index
    pub fn append_row<I, V>(&mut self, values: I) -> u32
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<CellValue>,
    {
        let row = values
            .into_iter()
            .map(|value| Cell {
                value: value.map(Into::into),
                ..Cell::default()
            })
            .collect();
        self.rows.push(row);
        (self.rows.len() - 1) as u32
    }

    /// Number of populated rows (one-based index of the last row, 0 when empty)
    pub fn max_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of columns in the widest row
    pub fn max_column(&self) -> u16 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as u16
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, at: CellRef) -> Option<&Cell> {
        self.rows.get(at.row as usize)?.get(at.col as usize)
    }

    /// Mutable access to a cell, growing the grid as needed
    pub fn cell_mut(&mut self, at: CellRef) -> &mut Cell {
        let row = at.row as usize;
        let col = at.col as usize;
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        &mut cells[col]
    }

    pub fn value(&self, at: CellRef) -> Option<&CellValue> {
        self.cell(at)?.value.as_ref()
    }

    pub fn set_style(&mut self, at: CellRef, style: CellStyle) {
        self.cell_mut(at).style = style;
    }

    pub fn unlock(&mut self, at: CellRef) {
        self.cell_mut(at).unlocked = true;
    }

    /// Whether a user can edit the cell in the spreadsheet application
    pub fn is_editable(&self, at: CellRef) -> bool {
        self.protection.is_none() || self.cell(at).is_some_and(|c| c.unlocked)
    }

    /// All unlocked cells, row-major
    pub fn unlocked_cells(&self) -> Vec<CellRef> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.unlocked)
                    .map(move |(c, _)| CellRef::new(r as u32, c as u16))
            })
            .collect()
    }

    pub fn protect(&mut self, password: impl Into<String>) {
        self.protection = Some(Protection {
            password: password.into(),
        });
    }

    pub fn protection(&self) -> Option<&Protection> {
        self.protection.as_ref()
    }

    pub fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths.iter().map(|(c, w)| (*c, *w))
    }

    pub fn set_page_setup(&mut self, page_setup: PageSetup) {
        self.page_setup = page_setup;
    }

    pub fn page_setup(&self) -> PageSetup {
        self.page_setup
    }

    pub fn add_validation(&mut self, validation: ListValidation) {
        self.validations.push(validation);
    }

    pub fn validations(&self) -> &[ListValidation] {
        &self.validations
    }

    /// The validation rule covering `at`, if any
    pub fn validation_at(&self, at: CellRef) -> Option<&ListValidation> {
        self.validations.iter().find(|v| v.target.contains(at))
    }
}

//==============================================================================
// Workbook
//==============================================================================

/// Sheets keyed by case-folded name, kept in creation order
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet at the end of the workbook
    ///
    /// Fails with [`CodesheetError::DuplicateSheet`] if a sheet of the same name
    /// (compared case-insensitively) exists, leaving the existing sheet untouched.
    pub fn add_sheet(&mut self, name: &str) -> CodesheetResult<&mut Sheet> {
        validate_sheet_name(name)?;
        let key = sheet_key(name);
        if self.sheets.contains_key(&key) {
            return Err(CodesheetError::DuplicateSheet(name.to_string()));
        }
        let entry = self.sheets.entry(key).or_insert_with(|| Sheet::new(name));
        Ok(entry)
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(&sheet_key(name))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(&sheet_key(name))
    }

    /// Position of a sheet in the workbook's tab order
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.get_index_of(&sheet_key(name))
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.values().map(Sheet::name).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

fn sheet_key(name: &str) -> String {
    name.to_lowercase()
}

/// Check a sheet name against the rules the .xlsx format enforces
pub fn validate_sheet_name(name: &str) -> CodesheetResult<()> {
    let invalid = |reason: &str| CodesheetError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(invalid(&format!("name contains '{}'", ch)));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid("name starts or ends with an apostrophe"));
    }
    if name.eq_ignore_ascii_case("history") {
        return Err(invalid("'History' is reserved"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sheet_rejects_duplicates_case_insensitively() {
        let mut wb = Workbook::new();
        wb.add_sheet("Interview").unwrap().append_row([Some("Line")]);

        let err = wb.add_sheet("INTERVIEW").unwrap_err();
        assert!(matches!(err, CodesheetError::DuplicateSheet(ref n) if n == "INTERVIEW"));

        // first sheet untouched
        assert_eq!(wb.len(), 1);
        assert_eq!(wb.sheet("interview").unwrap().max_row(), 1);
        assert_eq!(wb.sheet_names(), vec!["Interview"]);
    }

    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Intensity_P1").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("'quoted").is_err());
        assert!(validate_sheet_name("History").is_err());
    }

    #[test]
    fn test_append_row_and_grid_growth() {
        let mut sheet = Sheet::new("S");
        assert_eq!(sheet.max_row(), 0);
        let r0 = sheet.append_row([Some(CellValue::text("a")), None, Some(3u32.into())]);
        assert_eq!(r0, 0);
        assert_eq!(sheet.max_row(), 1);
        assert_eq!(sheet.max_column(), 3);
        assert_eq!(sheet.value(CellRef::new(0, 2)), Some(&CellValue::Integer(3)));
        assert_eq!(sheet.value(CellRef::new(0, 1)), None);

        sheet.unlock(CellRef::new(4, 5));
        assert_eq!(sheet.max_row(), 5);
        assert_eq!(sheet.unlocked_cells(), vec![CellRef::new(4, 5)]);
    }

    #[test]
    fn test_editability_follows_protection() {
        let mut sheet = Sheet::new("S");
        sheet.append_row([Some("x"), Some("y")]);
        assert!(sheet.is_editable(CellRef::new(0, 0)));

        sheet.protect("pw");
        sheet.unlock(CellRef::new(0, 1));
        assert!(!sheet.is_editable(CellRef::new(0, 0)));
        assert!(sheet.is_editable(CellRef::new(0, 1)));
        assert!(!sheet.is_editable(CellRef::new(9, 9)));
    }

    #[test]
    fn test_value_matching_is_type_sensitive() {
        assert!(CellValue::Integer(5).matches(&CellValue::Float(5.0)));
        assert!(!CellValue::Integer(5).matches(&CellValue::text("5")));
        assert!(CellValue::text("High").matches(&CellValue::text("high")));
        assert!(!CellValue::text("High").matches(&CellValue::text("Low")));
    }

    #[test]
    fn test_list_validation_formula_and_acceptance() {
        let mut wb = Workbook::new();
        let source = wb.add_sheet("Engagement_G1").unwrap();
        source.append_row([Some("value")]);
        source.append_row([Some("Low")]);
        source.append_row([Some("High")]);

        let rule = ListValidation {
            target: CellRange::single(CellRef::new(1, 1)),
            source_sheet: "Engagement_G1".to_string(),
            source: CellRange::column_span(0, 1, 2),
            allow_blank: true,
        };

        assert_eq!(rule.formula(), "'Engagement_G1'!$A$2:$A$3");
        assert!(rule.accepts(&wb, Some(&CellValue::text("High"))));
        assert!(rule.accepts(&wb, None));
        assert!(!rule.accepts(&wb, Some(&CellValue::text("Medium"))));
        // the header is not a legal value
        assert!(!rule.accepts(&wb, Some(&CellValue::text("value"))));
    }
}
