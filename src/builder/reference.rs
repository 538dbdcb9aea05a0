//! Hidden lookup sheets listing each property's legal values

use crate::error::{CodesheetError, CodesheetResult};
use crate::types::{DataType, Property, PropertyValue};
use crate::workbook::{CellRange, CellValue, Workbook};
use tracing::warn;

/// Header row of every reference sheet
pub const REFERENCE_HEADER: [&str; 4] = [
    "property_value",
    "property_description",
    "property_value_id",
    "property_id",
];

/// Column holding the values a validation rule draws from
pub const VALUE_COLUMN: u16 = 0;

/// Handle to a reference sheet that was just built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSheet {
    pub name: String,
    /// One-based index of the last populated row (1 when only the header exists)
    pub last_row: u32,
}

impl ReferenceSheet {
    pub fn value_count(&self) -> u32 {
        self.last_row.saturating_sub(1)
    }

    /// Value column from the first row below the header to the last populated row
    ///
    /// Empty (inverted, `$A$2:$A$1`) when the property has no values. Spreadsheet
    /// applications normalize that reference to `$A$1:$A$2` on load, so in the
    /// written file the header text becomes a selectable list entry; the model's
    /// [`ListValidation::accepts`](crate::workbook::ListValidation::accepts) still
    /// treats the rule as blank-only.
    pub fn value_range(&self) -> CellRange {
        // zero-based: header at row 0, last populated row at last_row - 1
        CellRange::column_span(VALUE_COLUMN, 1, self.last_row.saturating_sub(1))
    }
}

/// Name of the reference sheet for `property`: `{display_name}_{property_id}`
pub fn reference_sheet_name(property: &Property) -> String {
    format!("{}_{}", property.display_name, property.id)
}

/// Build the hidden, protected reference sheet for `property`
///
/// Returns `Ok(None)` when a sheet of that name already exists; the existing
/// sheet is left as-is and the caller must not wire validation for this property
/// a second time. Coercion failures are fatal and leave the workbook unchanged.
///
/// The sheet is protected with `password`, or with its own name when no password
/// is given. The protection only deters accidental edits.
pub fn build_reference_sheet(
    workbook: &mut Workbook,
    property: &Property,
    password: Option<&str>,
) -> CodesheetResult<Option<ReferenceSheet>> {
    let sheet_name = reference_sheet_name(property);

    // Coerce everything before touching the workbook
    let rows = property
        .iter()
        .map(|pv| Ok((coerce_value(property, pv)?, pv)))
        .collect::<CodesheetResult<Vec<_>>>()?;

    let sheet = match workbook.add_sheet(&sheet_name) {
        Ok(sheet) => sheet,
        Err(CodesheetError::DuplicateSheet(name)) => {
            warn!(sheet = %name, property = %property.id, "reference sheet already exists, skipping");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    sheet.append_row(REFERENCE_HEADER.map(Some));
    for (value, pv) in rows {
        sheet.append_row([
            Some(value),
            Some(CellValue::text(&pv.description)),
            Some(CellValue::text(&pv.value_id)),
            Some(CellValue::text(&pv.property_id)),
        ]);
    }

    sheet.protect(password.unwrap_or(sheet_name.as_str()));
    sheet.hide();

    if property.is_empty() {
        warn!(sheet = %sheet_name, "property has no values; only blank entries will validate");
    }

    Ok(Some(ReferenceSheet {
        last_row: sheet.max_row(),
        name: sheet_name,
    }))
}

/// Materialize a stored value in its property's declared type
///
/// List validation compares entries with the reference column literally, so a
/// numeric property must store numbers there, not digit strings.
pub fn coerce_value(property: &Property, pv: &PropertyValue) -> CodesheetResult<CellValue> {
    let raw = pv.value.trim();
    let mismatch = || CodesheetError::TypeCoercion {
        property_id: property.id.clone(),
        value: pv.value.clone(),
        expected: property.data_type.type_name().to_string(),
    };

    match property.data_type {
        DataType::Text => Ok(CellValue::Text(pv.value.clone())),
        DataType::Numeric { decimal_digits } => {
            if decimal_digits == 0 {
                if let Ok(i) = raw.parse::<i64>() {
                    return Ok(CellValue::Integer(i));
                }
            }
            let number = raw.parse::<f64>().map_err(|_| mismatch())?;
            if !number.is_finite() || !fits_precision(number, decimal_digits) {
                return Err(mismatch());
            }
            if decimal_digits > 0 {
                return Ok(CellValue::Float(number));
            }
            if number.abs() >= i64::MAX as f64 {
                return Err(mismatch());
            }
            Ok(CellValue::Integer(number as i64))
        }
    }
}

/// Whether `number` survives rounding to `decimal_digits` places unchanged
///
/// Works on the parsed value, so `0.25`, `2.5e-1` and `0.250` are judged alike.
fn fits_precision(number: f64, decimal_digits: u32) -> bool {
    format!("{:.*}", decimal_digits as usize, number)
        .parse::<f64>()
        .is_ok_and(|rounded| rounded == number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{CellRef, Visibility};

    fn intensity() -> Property {
        Property::coding("P1", "Intensity", DataType::Numeric { decimal_digits: 0 })
            .with_value("1", "mild", "V1")
            .with_value("2", "moderate", "V2")
            .with_value("3", "strong", "V3")
    }

    #[test]
    fn test_reference_sheet_layout() {
        let mut wb = Workbook::new();
        let handle = build_reference_sheet(&mut wb, &intensity(), None)
            .unwrap()
            .unwrap();

        assert_eq!(handle.name, "Intensity_P1");
        assert_eq!(handle.last_row, 4);
        assert_eq!(handle.value_count(), 3);
        assert_eq!(handle.value_range().to_absolute(), "$A$2:$A$4");

        let sheet = wb.sheet("Intensity_P1").unwrap();
        assert_eq!(
            sheet.value(CellRef::new(0, 0)),
            Some(&CellValue::text("property_value"))
        );
        assert_eq!(sheet.value(CellRef::new(1, 0)), Some(&CellValue::Integer(1)));
        assert_eq!(sheet.value(CellRef::new(3, 0)), Some(&CellValue::Integer(3)));
        assert_eq!(sheet.value(CellRef::new(2, 1)), Some(&CellValue::text("moderate")));
        assert_eq!(sheet.value(CellRef::new(2, 2)), Some(&CellValue::text("V2")));
        assert_eq!(sheet.value(CellRef::new(2, 3)), Some(&CellValue::text("P1")));
    }

    #[test]
    fn test_reference_sheet_is_hidden_and_locked() {
        let mut wb = Workbook::new();
        build_reference_sheet(&mut wb, &intensity(), None).unwrap();
        let sheet = wb.sheet("Intensity_P1").unwrap();

        assert_eq!(sheet.visibility(), Visibility::Hidden);
        assert_eq!(sheet.protection().unwrap().password, "Intensity_P1");
        assert!(sheet.unlocked_cells().is_empty());
    }

    #[test]
    fn test_password_override() {
        let mut wb = Workbook::new();
        build_reference_sheet(&mut wb, &intensity(), Some("s3cret")).unwrap();
        assert_eq!(
            wb.sheet("Intensity_P1").unwrap().protection().unwrap().password,
            "s3cret"
        );
    }

    #[test]
    fn test_second_request_is_a_noop() {
        let mut wb = Workbook::new();
        assert!(build_reference_sheet(&mut wb, &intensity(), None)
            .unwrap()
            .is_some());
        assert!(build_reference_sheet(&mut wb, &intensity(), None)
            .unwrap()
            .is_none());
        assert_eq!(wb.len(), 1);
        assert_eq!(wb.sheet("Intensity_P1").unwrap().max_row(), 4);
    }

    #[test]
    fn test_empty_property_has_header_only() {
        let mut wb = Workbook::new();
        let empty = Property::global("G9", "Empty", DataType::Text);
        let handle = build_reference_sheet(&mut wb, &empty, None).unwrap().unwrap();

        assert_eq!(handle.last_row, 1);
        assert_eq!(handle.value_range().row_count(), 0);
        assert_eq!(handle.value_range().to_absolute(), "$A$2:$A$1");
        assert_eq!(wb.sheet("Empty_G9").unwrap().max_row(), 1);
    }

    #[test]
    fn test_coercion_by_data_type() {
        let text = Property::global("G1", "Engagement", DataType::Text).with_value("5", "", "V");
        assert_eq!(
            coerce_value(&text, &text.values()[0]).unwrap(),
            CellValue::text("5")
        );

        let decimal = Property::coding("P2", "Score", DataType::Numeric { decimal_digits: 1 })
            .with_value("2.5", "", "V1")
            .with_value("3", "", "V2")
            .with_value("1.50", "", "V3");
        let coerced: Vec<CellValue> = decimal
            .iter()
            .map(|pv| coerce_value(&decimal, pv).unwrap())
            .collect();
        assert_eq!(
            coerced,
            vec![
                CellValue::Float(2.5),
                CellValue::Float(3.0),
                CellValue::Float(1.5)
            ]
        );
    }

    #[test]
    fn test_coercion_failures_are_fatal_and_leave_workbook_unchanged() {
        let mut wb = Workbook::new();
        let bad = Property::coding("P1", "Intensity", DataType::Numeric { decimal_digits: 0 })
            .with_value("1", "", "V1")
            .with_value("high", "", "V2");

        let err = build_reference_sheet(&mut wb, &bad, None).unwrap_err();
        match err {
            CodesheetError::TypeCoercion {
                property_id,
                value,
                expected,
            } => {
                assert_eq!(property_id, "P1");
                assert_eq!(value, "high");
                assert_eq!(expected, "integer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(wb.is_empty());
    }

    #[test]
    fn test_precision_is_enforced() {
        let int = Property::coding("P1", "I", DataType::Numeric { decimal_digits: 0 })
            .with_value("2.5", "", "V");
        assert!(coerce_value(&int, &int.values()[0]).is_err());

        let one = Property::coding("P2", "D", DataType::Numeric { decimal_digits: 1 })
            .with_value("2.25", "", "V");
        assert!(coerce_value(&one, &one.values()[0]).is_err());

        let nan = Property::coding("P3", "N", DataType::Numeric { decimal_digits: 2 })
            .with_value("NaN", "", "V");
        assert!(coerce_value(&nan, &nan.values()[0]).is_err());
    }

    #[test]
    fn test_precision_ignores_spelling() {
        let one = Property::coding("P2", "D", DataType::Numeric { decimal_digits: 1 })
            .with_value("2.5e-1", "", "V1")
            .with_value("0.25", "", "V2")
            .with_value("2.5E0", "", "V3")
            .with_value("0.50", "", "V4");
        let results: Vec<bool> = one
            .iter()
            .map(|pv| coerce_value(&one, pv).is_ok())
            .collect();
        assert_eq!(results, vec![false, false, true, true]);
        assert_eq!(
            coerce_value(&one, &one.values()[2]).unwrap(),
            CellValue::Float(2.5)
        );
    }

    #[test]
    fn test_whole_numbers_with_trailing_zeros_are_integers() {
        let int = Property::coding("P1", "I", DataType::Numeric { decimal_digits: 0 })
            .with_value("2", "", "V1")
            .with_value("2.0", "", "V2")
            .with_value("3e2", "", "V3")
            .with_value("1e300", "", "V4");
        let coerced: Vec<Option<CellValue>> = int
            .iter()
            .map(|pv| coerce_value(&int, pv).ok())
            .collect();
        assert_eq!(
            coerced,
            vec![
                Some(CellValue::Integer(2)),
                Some(CellValue::Integer(2)),
                Some(CellValue::Integer(300)),
                None
            ]
        );
    }
}
