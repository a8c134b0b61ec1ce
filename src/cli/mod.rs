//! Command-line interface for lipid-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **match**: Annotate the signals of an input file against its lipid library
//! - **list**: List input files available in a directory
//! - **ppm**: Compute the ppm error of a single observed/reference pair
//!
//! ## Usage
//!
//! ```text
//! # Annotate a workbook holding both tables, writing Processed/Processed_run_42.xlsx
//! lipid-match match run_42.xlsx
//!
//! # Pick the input interactively from a directory
//! lipid-match match --dir exports/
//!
//! # Library and signals in separate files, 3 ppm window, CSV output
//! lipid-match match library.xlsx --signals peaks.csv --tolerance-ppm 3 -o out.csv
//!
//! # JSON report for scripting
//! lipid-match match run_42.xlsx --format json
//! ```

use clap::{Parser, Subcommand};

pub mod annotate;
pub mod list;
pub mod picker;
pub mod ppm;

#[derive(Parser)]
#[command(name = "lipid-match")]
#[command(version)]
#[command(about = "Annotate mass-spectrometry signals against a lipid reference library")]
#[command(
    long_about = "lipid-match compares observed signal masses with the exact masses of a lipid reference library.\n\nFor every signal it reports the library entries whose ppm mass error falls inside the tolerance window, ranked from the highest error to the lowest, and writes one result row per signal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match signals against the reference library and write the result table
    Match(annotate::MatchArgs),

    /// List input files in a directory
    List(list::ListArgs),

    /// Compute the ppm error between an observed and a reference mass
    Ppm(ppm::PpmArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
