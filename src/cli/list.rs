use std::path::PathBuf;

use clap::Args;

use crate::cli::picker::discover_inputs;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct ListArgs {
    /// Directory to search
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

/// Execute list subcommand
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ListArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let files = discover_inputs(&args.dir)?;

    if verbose {
        eprintln!("Found {} input file(s) in {}", files.len(), args.dir.display());
    }

    match format {
        OutputFormat::Text => {
            if files.is_empty() {
                println!("No input files found in {}", args.dir.display());
            }
            for (idx, path) in files.iter().enumerate() {
                println!("{:>3}) {}", idx + 1, path.display());
            }
        }
        OutputFormat::Json => {
            let paths: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
        OutputFormat::Tsv => {
            for path in &files {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
