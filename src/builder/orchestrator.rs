//! End-to-end assembly of a coding workbook

use super::global::{build_global_sheet, global_row, GLOBAL_SHEET};
use super::interview::{build_interview_sheet, coding_column, INTERVIEW_SHEET};
use super::reference::{build_reference_sheet, reference_sheet_name};
use super::validation::{wire_validation, Location};
use crate::error::{CodesheetError, CodesheetResult};
use crate::types::{CodingScheme, Interview, Property, PropertyKind};
use crate::workbook::{CellRange, Workbook};
use tracing::info;

/// Tunables for one assembly run
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Password for every reference sheet; each sheet's own name when unset
    pub reference_password: Option<String>,
}

/// Hands out data-sheet locations in configuration order
///
/// Coding columns start right after the descriptive columns and global rows right
/// after the header; both only move forward, so no two properties share a slot.
#[derive(Debug, Default)]
pub struct LocationAllocator {
    coding_used: usize,
    globals_used: usize,
}

impl LocationAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: PropertyKind) -> CodesheetResult<Location> {
        match kind {
            PropertyKind::Coding => {
                let col = coding_column(self.coding_used)?;
                self.coding_used += 1;
                Ok(Location::Column(col))
            }
            PropertyKind::Global => {
                let row = global_row(self.globals_used);
                self.globals_used += 1;
                Ok(Location::GlobalRow(row))
            }
        }
    }
}

/// A property whose entry cells are bound to its reference sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiredProperty {
    pub property_id: String,
    pub kind: PropertyKind,
    pub reference_sheet: String,
    pub data_sheet: &'static str,
    pub location: Location,
    /// Validated cells; `None` for a coding property when there are no utterances
    pub target: Option<CellRange>,
}

/// A property left unvalidated because its reference sheet name was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProperty {
    pub property_id: String,
    pub kind: PropertyKind,
    pub reference_sheet: String,
    pub location: Location,
}

/// Result of a successful run
#[derive(Debug)]
pub struct Assembly {
    pub workbook: Workbook,
    pub wired: Vec<WiredProperty>,
    pub skipped: Vec<SkippedProperty>,
}

impl Assembly {
    pub fn is_fully_validated(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Build the complete workbook for `interview` coded with `scheme`
///
/// Order: interview sheet, global sheet, then for each coding property followed by
/// each global property its reference sheet and validation rule. Any fatal error
/// aborts the run and no workbook is returned.
pub fn assemble(
    scheme: &CodingScheme,
    interview: &Interview,
    options: &AssemblyOptions,
) -> CodesheetResult<Assembly> {
    let mut workbook = Workbook::new();
    build_interview_sheet(&mut workbook, scheme.coding_properties(), &interview.utterances)?;
    build_global_sheet(&mut workbook, scheme.global_properties())?;

    let mut allocator = LocationAllocator::new();
    let mut wired = Vec::new();
    let mut skipped = Vec::new();

    for property in scheme.properties() {
        // The slot belongs to the property even when its rule cannot be wired
        let location = allocator.allocate(property.kind)?;

        match wire_property(&mut workbook, property, location, options)? {
            Some(w) => wired.push(w),
            None => skipped.push(SkippedProperty {
                property_id: property.id.clone(),
                kind: property.kind,
                reference_sheet: reference_sheet_name(property),
                location,
            }),
        }
    }

    info!(
        interview = %interview.name,
        utterances = interview.utterances.len(),
        sheets = workbook.len(),
        wired = wired.len(),
        skipped = skipped.len(),
        "workbook assembled"
    );

    Ok(Assembly {
        workbook,
        wired,
        skipped,
    })
}

fn wire_property(
    workbook: &mut Workbook,
    property: &Property,
    location: Location,
    options: &AssemblyOptions,
) -> CodesheetResult<Option<WiredProperty>> {
    let Some(reference) =
        build_reference_sheet(workbook, property, options.reference_password.as_deref())?
    else {
        return Ok(None);
    };

    let data_sheet = match property.kind {
        PropertyKind::Coding => INTERVIEW_SHEET,
        PropertyKind::Global => GLOBAL_SHEET,
    };
    let sheet = workbook
        .sheet_mut(data_sheet)
        .ok_or_else(|| CodesheetError::MissingSheet(data_sheet.to_string()))?;
    let target = wire_validation(sheet, location, &reference);

    Ok(Some(WiredProperty {
        property_id: property.id.clone(),
        kind: property.kind,
        reference_sheet: reference.name,
        data_sheet,
        location,
        target,
    }))
}
