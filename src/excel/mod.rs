//! Excel export for assembled workbooks
//!
//! The model in [`crate::workbook`] is serialized to .xlsx here; nothing else in
//! the crate depends on the file format.

mod exporter;

pub use exporter::WorkbookExporter;
