//! Codesheet - coding workbooks for behavioral interviews
//!
//! This library turns a parsed interview and its coding scheme into a
//! spreadsheet where coders can only enter legal values.
//!
//! # Features
//!
//! - Interview sheet: one row per utterance, one entry column per coding property
//! - Global sheet: one row per global property
//! - One hidden, locked reference sheet per property listing its legal values
//! - List validation on every entry cell, wired to the matching reference sheet
//! - Only entry cells unlocked; everything else protected
//! - .xlsx export
//!
//! # Example
//!
//! ```no_run
//! use codesheet::builder::{assemble, AssemblyOptions};
//! use codesheet::excel::WorkbookExporter;
//! use codesheet::parser::{parse_interview, parse_scheme};
//! use std::path::{Path, PathBuf};
//!
//! let scheme = parse_scheme(Path::new("scheme.yaml"))?;
//! let interview = parse_interview(&[PathBuf::from("session.yaml")])?;
//!
//! let assembly = assemble(&scheme, &interview, &AssemblyOptions::default())?;
//! println!("Sheets: {}", assembly.workbook.len());
//!
//! WorkbookExporter::new(&assembly.workbook).export(Path::new("session.xlsx"))?;
//! # Ok::<(), codesheet::error::CodesheetError>(())
//! ```

pub mod builder;
pub mod cli;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use builder::{assemble, Assembly, AssemblyOptions};
pub use error::{CodesheetError, CodesheetResult};
pub use types::{CodingScheme, DataType, Interview, Property, PropertyKind, PropertyValue, Utterance};
pub use workbook::{CellRef, CellValue, Sheet, Workbook};
