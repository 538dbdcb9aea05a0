//! The whole-interview ratings sheet

use crate::error::CodesheetResult;
use crate::types::Property;
use crate::workbook::style::{self, BORDERED};
use crate::workbook::{CellRef, CellValue, Workbook};

pub const GLOBAL_SHEET: &str = "Global Ratings";
pub const GLOBAL_PASSWORD: &str = "Globals";

pub const GLOBAL_HEADER: [&str; 2] = ["Global", "Rating"];

/// Column holding the global's display name
pub const NAME_COLUMN: u16 = 0;
/// Column where the rating is entered
pub const RATING_COLUMN: u16 = 1;

/// Zero-based row of the `position`-th global property (header is row 0)
///
/// Validation wiring targets the same row, so both must use this function.
pub fn global_row(position: usize) -> u32 {
    position as u32 + 1
}

/// Lay out the global ratings sheet: one row per global, rating cells unlocked
pub fn build_global_sheet(
    workbook: &mut Workbook,
    global_properties: &[Property],
) -> CodesheetResult<()> {
    let sheet = workbook.add_sheet(GLOBAL_SHEET)?;
    sheet.protect(GLOBAL_PASSWORD);
    sheet.append_row(GLOBAL_HEADER.map(Some));

    for (position, gp) in global_properties.iter().enumerate() {
        let row = sheet.append_row([Some(CellValue::text(&gp.display_name)), None]);
        debug_assert_eq!(row, global_row(position));
        sheet.unlock(CellRef::new(row, RATING_COLUMN));
    }

    let widest = global_properties
        .iter()
        .map(|gp| gp.display_name.chars().count() as f64)
        .fold(style::GLOBAL_NAME_MIN_WIDTH, f64::max);
    sheet.set_column_width(NAME_COLUMN, widest);

    for row in 0..sheet.max_row() {
        for col in [NAME_COLUMN, RATING_COLUMN] {
            sheet.set_style(CellRef::new(row, col), BORDERED);
        }
    }

    Ok(())
}
