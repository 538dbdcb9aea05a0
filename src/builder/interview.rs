//! The per-utterance data-entry sheet

use crate::error::CodesheetResult;
use crate::types::{Property, Utterance};
use crate::workbook::style::{self, BORDERED, BORDERED_TEXT};
use crate::workbook::{
    checked_column, CellRef, CellValue, Orientation, PageSetup, Sheet, Workbook,
};

pub const INTERVIEW_SHEET: &str = "Interview";
pub const INTERVIEW_PASSWORD: &str = "Interview";

/// Line, Utt and Role precede the coding columns
pub const DESCRIPTIVE_HEADERS: [&str; 3] = ["Line", "Utt", "Role"];
pub const TEXT_HEADER: &str = "Text";

/// Zero-based row of the first utterance (row 2 in A1 terms)
pub const FIRST_DATA_ROW: u32 = 1;

/// Zero-based column of the `position`-th coding property
pub fn coding_column(position: usize) -> CodesheetResult<u16> {
    checked_column(DESCRIPTIVE_HEADERS.len() + position)
}

/// Zero-based column of the utterance text, after all coding columns
pub fn text_column(coding_count: usize) -> CodesheetResult<u16> {
    coding_column(coding_count)
}

/// Lay out the interview sheet
///
/// Header `Line, Utt, Role, <coding properties...>, Text`, then one row per
/// utterance in input order with the coding cells left blank. Only those coding
/// cells are unlocked; everything else stays locked under sheet protection.
pub fn build_interview_sheet<'a, I>(
    workbook: &mut Workbook,
    coding_properties: &[Property],
    utterances: I,
) -> CodesheetResult<()>
where
    I: IntoIterator<Item = &'a Utterance>,
{
    // Fail before creating anything if the layout cannot be addressed
    let text_col = text_column(coding_properties.len())?;
    let coding_count = coding_properties.len();

    let sheet = workbook.add_sheet(INTERVIEW_SHEET)?;
    sheet.protect(INTERVIEW_PASSWORD);

    let header = DESCRIPTIVE_HEADERS
        .iter()
        .map(|h| Some(CellValue::text(*h)))
        .chain(
            coding_properties
                .iter()
                .map(|cp| Some(CellValue::text(&cp.display_name))),
        )
        .chain(std::iter::once(Some(CellValue::text(TEXT_HEADER))));
    sheet.append_row(header);

    for utt in utterances {
        let row = [
            Some(CellValue::from(utt.line_number)),
            Some(CellValue::from(utt.utterance_number)),
            Some(CellValue::text(&utt.speaker_role)),
        ]
        .into_iter()
        .chain(std::iter::repeat(None).take(coding_count))
        .chain(std::iter::once(Some(CellValue::text(&utt.text))));
        let row_idx = sheet.append_row(row);

        for position in 0..coding_count {
            sheet.unlock(CellRef::new(row_idx, coding_column(position)?));
        }
    }

    apply_styles(sheet, text_col);
    Ok(())
}

fn apply_styles(sheet: &mut Sheet, text_col: u16) {
    sheet.set_column_width(text_col, style::TEXT_COLUMN_WIDTH);
    sheet.set_page_setup(PageSetup {
        orientation: Orientation::Landscape,
        fit_to_pages: Some((1, 1)),
    });

    for row in 0..sheet.max_row() {
        for col in 0..=text_col {
            let style = if col == text_col { BORDERED_TEXT } else { BORDERED };
            sheet.set_style(CellRef::new(row, col), style);
        }
    }
}
