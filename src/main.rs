use anyhow::Context;
use clap::{Parser, Subcommand};
use codesheet::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codesheet")]
#[command(about = "Build protected, list-validated coding workbooks from interview transcripts")]
#[command(long_about = "Codesheet - coding workbooks for behavioral interviews

Turns a coding scheme and an interview transcript into an .xlsx workbook:
  Interview       - one row per utterance, one entry column per coding property
  Global Ratings  - one row per global property, rating column for entry
  <Name>_<Id>     - hidden, locked list of legal values for each property

Every entry cell only accepts values from its property's list (or blank);
everything else is locked.

COMMANDS:
  convert   - Build and write the workbook
  plan      - Show where each property lands, without writing

EXAMPLES:
  codesheet convert scheme.yaml session.yaml -o session.xlsx
  codesheet convert scheme.yaml part1.json part2.json -o session.xlsx
  codesheet plan scheme.yaml session.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the coding workbook and write it to an .xlsx file.

Several interview files are concatenated in the order given.

Reference sheets are protected with their own name unless
--reference-password is given. Protection is a soft lock against
accidental edits, not a security measure.")]
    /// Build and write the coding workbook
    Convert {
        /// Coding scheme (YAML or JSON)
        scheme: PathBuf,

        /// Interview file(s) (YAML or JSON)
        #[arg(required = true)]
        interviews: Vec<PathBuf>,

        /// Output .xlsx file
        #[arg(short, long)]
        output: PathBuf,

        /// Password for all reference sheets
        #[arg(long)]
        reference_password: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the property layout without writing a file
    Plan {
        /// Coding scheme (YAML or JSON)
        scheme: PathBuf,

        /// Interview file(s) (YAML or JSON)
        #[arg(required = true)]
        interviews: Vec<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "codesheet=debug"
    } else {
        "codesheet=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            scheme,
            interviews,
            output,
            reference_password,
            verbose,
        } => {
            init_tracing(verbose);
            cli::convert(scheme, interviews, output, reference_password, verbose)
                .context("failed to build coding workbook")
        }

        Commands::Plan { scheme, interviews } => {
            init_tracing(false);
            cli::plan(scheme, interviews).context("failed to plan coding workbook")
        }
    }
}
