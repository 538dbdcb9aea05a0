//! Excel exporter implementation - workbook model → .xlsx

use crate::error::{CodesheetError, CodesheetResult};
use crate::workbook::style::{Alignment, Border, HorizontalAlign, VerticalAlign};
use crate::workbook::{CellStyle, CellValue, Orientation, Sheet, Workbook};
use rust_xlsxwriter::{
    Color, DataValidation, Format, FormatAlign, FormatBorder, Formula, Workbook as XlsxWorkbook,
    Worksheet,
};
use std::collections::HashMap;
use std::path::Path;

/// Serializes an assembled [`Workbook`] with `rust_xlsxwriter`
pub struct WorkbookExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> WorkbookExporter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Export the workbook to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> CodesheetResult<()> {
        let mut xlsx = self.build()?;
        xlsx.save(output_path)
            .map_err(|e| CodesheetError::Export(format!("Failed to save Excel file: {}", e)))?;
        Ok(())
    }

    /// Export the workbook to an in-memory .xlsx file
    pub fn to_buffer(&self) -> CodesheetResult<Vec<u8>> {
        let mut xlsx = self.build()?;
        xlsx.save_to_buffer()
            .map_err(|e| CodesheetError::Export(format!("Failed to serialize workbook: {}", e)))
    }

    fn build(&self) -> CodesheetResult<XlsxWorkbook> {
        let mut xlsx = XlsxWorkbook::new();
        let mut formats = FormatCache::default();

        for sheet in self.workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet.name()).map_err(|e| {
                CodesheetError::Export(format!("Failed to set worksheet name: {}", e))
            })?;
            Self::export_sheet(worksheet, sheet, &mut formats)?;
        }

        Ok(xlsx)
    }

    fn export_sheet(
        worksheet: &mut Worksheet,
        sheet: &Sheet,
        formats: &mut FormatCache,
    ) -> CodesheetResult<()> {
        for (row_idx, cells) in sheet.rows().iter().enumerate() {
            let row = row_idx as u32;
            for (col_idx, cell) in cells.iter().enumerate() {
                if cell.is_untouched() {
                    continue;
                }
                let col = col_idx as u16;
                let format = formats.get(cell.style, cell.unlocked);
                let written = match &cell.value {
                    Some(CellValue::Integer(i)) => {
                        worksheet.write_number_with_format(row, col, *i as f64, format)
                    }
                    Some(CellValue::Float(f)) => {
                        worksheet.write_number_with_format(row, col, *f, format)
                    }
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string_with_format(row, col, s, format)
                    }
                    None => worksheet.write_blank(row, col, format),
                };
                written.map_err(|e| {
                    CodesheetError::Export(format!(
                        "Failed to write cell {}!{}: {}",
                        sheet.name(),
                        crate::workbook::CellRef::new(row, col),
                        e
                    ))
                })?;
            }
        }

        for (col, width) in sheet.column_widths() {
            worksheet
                .set_column_width(col, width)
                .map_err(|e| CodesheetError::Export(format!("Failed to set column width: {}", e)))?;
        }

        let page_setup = sheet.page_setup();
        if page_setup.orientation == Orientation::Landscape {
            worksheet.set_landscape();
        }
        if let Some((width, height)) = page_setup.fit_to_pages {
            worksheet.set_print_fit_to_pages(width, height);
        }

        for rule in sheet.validations() {
            let validation = DataValidation::new()
                .allow_list_formula(Formula::new(rule.formula()))
                .ignore_blank(rule.allow_blank);
            worksheet
                .add_data_validation(
                    rule.target.first.row,
                    rule.target.first.col,
                    rule.target.last.row,
                    rule.target.last.col,
                    &validation,
                )
                .map_err(|e| {
                    CodesheetError::Export(format!(
                        "Failed to add validation on {}!{}: {}",
                        sheet.name(),
                        rule.target,
                        e
                    ))
                })?;
        }

        if let Some(protection) = sheet.protection() {
            worksheet.protect_with_password(&protection.password);
        }
        if sheet.is_hidden() {
            worksheet.set_hidden(true);
        }

        Ok(())
    }
}

/// One `Format` per distinct (style, unlocked) pair
#[derive(Default)]
struct FormatCache {
    formats: HashMap<(CellStyle, bool), Format>,
}

impl FormatCache {
    fn get(&mut self, style: CellStyle, unlocked: bool) -> &Format {
        self.formats
            .entry((style, unlocked))
            .or_insert_with(|| to_format(style, unlocked))
    }
}

fn to_format(style: CellStyle, unlocked: bool) -> Format {
    let mut format = Format::new();

    if let Some(Border::Thin) = style.border {
        format = format
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);
    }
    if let Some(alignment) = style.alignment {
        format = apply_alignment(format, alignment);
    }
    if unlocked {
        format = format.set_unlocked();
    }

    format
}

fn apply_alignment(mut format: Format, alignment: Alignment) -> Format {
    format = match alignment.horizontal {
        HorizontalAlign::Left => format.set_align(FormatAlign::Left),
    };
    format = match alignment.vertical {
        VerticalAlign::Bottom => format.set_align(FormatAlign::Bottom),
    };
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    format
}
