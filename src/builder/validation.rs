//! Restrict-to-list rules binding data-entry cells to reference sheets

use super::global::RATING_COLUMN;
use super::interview::FIRST_DATA_ROW;
use super::reference::ReferenceSheet;
use crate::workbook::{column_index_to_letter, CellRange, CellRef, ListValidation, Sheet};
use tracing::debug;

/// Where on a data sheet a property's entries live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Zero-based row on the global sheet; the rule covers that row's rating cell
    GlobalRow(u32),
    /// Zero-based column on the interview sheet; the rule covers every data row
    Column(u16),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::GlobalRow(row) => write!(f, "row {}", row + 1),
            Location::Column(col) => write!(f, "column {}", column_index_to_letter(*col)),
        }
    }
}

/// Cells a rule at `location` covers on `data_sheet`
///
/// A column rule spans the first data row to the sheet's last row; `None` when
/// the sheet has no data rows.
pub fn target_range(data_sheet: &Sheet, location: Location) -> Option<CellRange> {
    match location {
        Location::GlobalRow(row) => Some(CellRange::single(CellRef::new(row, RATING_COLUMN))),
        Location::Column(col) => {
            let last_row = data_sheet.max_row().checked_sub(1)?;
            (last_row >= FIRST_DATA_ROW)
                .then(|| CellRange::column_span(col, FIRST_DATA_ROW, last_row))
        }
    }
}

/// Install a list rule on `data_sheet` whose allowed values are `reference`'s value column
///
/// Blank entries are always permitted so a coder can leave a cell unscored. A
/// reference sheet without values yields a rule that accepts nothing but blank.
/// Nothing is installed when there are no entry cells to cover.
pub fn wire_validation(
    data_sheet: &mut Sheet,
    location: Location,
    reference: &ReferenceSheet,
) -> Option<CellRange> {
    let Some(target) = target_range(data_sheet, location) else {
        debug!(
            sheet = data_sheet.name(),
            reference = %reference.name,
            "no entry rows, list validation not installed"
        );
        return None;
    };
    let rule = ListValidation {
        target,
        source_sheet: reference.name.clone(),
        source: reference.value_range(),
        allow_blank: true,
    };

    debug!(
        sheet = data_sheet.name(),
        target = %target,
        source = %rule.formula(),
        "wired list validation"
    );

    data_sheet.add_validation(rule);
    Some(target)
}
