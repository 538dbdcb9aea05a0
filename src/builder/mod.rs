//! Workbook assembly engine
//!
//! Maps a coding scheme onto the workbook layout:
//! - `interview`: one row per utterance, one entry column per coding property
//! - `global`: one row per global property with a rating cell
//! - `reference`: one hidden, locked lookup sheet per property
//! - `validation`: list rules tying entry cells to a lookup sheet
//! - `orchestrator`: runs the above in order and allocates locations

pub mod global;
pub mod interview;
pub mod orchestrator;
pub mod reference;
pub mod validation;

pub use orchestrator::{
    assemble, Assembly, AssemblyOptions, LocationAllocator, SkippedProperty, WiredProperty,
};
pub use reference::{build_reference_sheet, reference_sheet_name, ReferenceSheet};
pub use validation::{wire_validation, Location};
