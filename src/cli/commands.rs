use crate::builder::{assemble, Assembly, AssemblyOptions, Location};
use crate::error::CodesheetResult;
use crate::excel::WorkbookExporter;
use crate::parser;
use crate::types::{CodingScheme, Interview};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the convert command
pub fn convert(
    scheme: PathBuf,
    interviews: Vec<PathBuf>,
    output: PathBuf,
    reference_password: Option<String>,
    verbose: bool,
) -> CodesheetResult<()> {
    println!("{}", "📋 Codesheet - Build coding workbook".bold().green());
    println!("   Scheme: {}", scheme.display());
    for file in &interviews {
        println!("   Interview: {}", file.display());
    }
    println!("   Output: {}\n", output.display());

    let (scheme_model, interview) = load_inputs(&scheme, &interviews, verbose)?;

    if verbose {
        println!("{}", "🧱 Assembling workbook...".cyan());
    }

    let options = AssemblyOptions { reference_password };
    let assembly = assemble(&scheme_model, &interview, &options)?;

    if verbose {
        println!("{}", "📊 Writing Excel file...".cyan());
    }

    WorkbookExporter::new(&assembly.workbook).export(&output)?;

    println!("{}", "✅ Workbook written!".bold().green());
    println!("   Excel file: {}", output.display());
    print_summary(&assembly);

    Ok(())
}

/// Execute the plan command - show where each property lands without writing
pub fn plan(scheme: PathBuf, interviews: Vec<PathBuf>) -> CodesheetResult<()> {
    println!("{}", "🗺️  Codesheet - Layout plan".bold().green());
    println!("   Scheme: {}\n", scheme.display());

    let (scheme_model, interview) = load_inputs(&scheme, &interviews, false)?;
    let assembly = assemble(&scheme_model, &interview, &AssemblyOptions::default())?;

    println!("{}", "📐 Property locations:".bold().cyan());
    for wired in &assembly.wired {
        let target = match wired.target {
            Some(range) => format!("{}!{}", wired.data_sheet, range),
            None => format!("{} {} (no entry rows)", wired.data_sheet, wired.location),
        };
        println!(
            "   {} {} → {} (list from {})",
            format!("[{}]", wired.kind.as_str()).dimmed(),
            wired.property_id.bright_blue().bold(),
            target,
            wired.reference_sheet.cyan()
        );
    }
    println!();
    print_summary(&assembly);

    Ok(())
}

fn load_inputs(
    scheme: &Path,
    interviews: &[PathBuf],
    verbose: bool,
) -> CodesheetResult<(CodingScheme, Interview)> {
    if verbose {
        println!("{}", "📖 Reading coding scheme...".cyan());
    }
    let scheme_model = parser::parse_scheme(scheme)?;

    if verbose {
        println!(
            "   Found {} coding properties, {} global properties\n",
            scheme_model.coding_properties().len(),
            scheme_model.global_properties().len()
        );
        println!("{}", "📖 Reading interview...".cyan());
    }
    let interview = parser::parse_interview(interviews)?;

    if verbose {
        println!("   Found {} utterances\n", interview.utterances.len());
    }

    Ok((scheme_model, interview))
}

fn print_summary(assembly: &Assembly) {
    println!("   Sheets: {}", assembly.workbook.len());
    println!("   Validated properties: {}", assembly.wired.len());

    if assembly.is_fully_validated() {
        println!();
        return;
    }

    println!(
        "{}",
        format!(
            "⚠️  {} properties left unvalidated (reference sheet name already taken):",
            assembly.skipped.len()
        )
        .yellow()
    );
    for skipped in &assembly.skipped {
        let place = match skipped.location {
            Location::Column(_) => "Interview",
            Location::GlobalRow(_) => "Global Ratings",
        };
        println!(
            "   {} {} ({} {})",
            skipped.property_id.yellow().bold(),
            skipped.reference_sheet,
            place,
            skipped.location
        );
    }
    println!();
}
