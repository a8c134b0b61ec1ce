use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::picker::{choose_input, validate_input_path, PromptSelector};
use crate::cli::OutputFormat;
use crate::config::{ConfigFile, LayoutOverrides, RunConfig};
use crate::core::types::SignalResult;
use crate::matching::{MatchSummary, MatchingConfig, MatchingEngine};
use crate::output::{default_output_path, format_confidence, write_table, ResultTable};
use crate::parsing;

#[derive(Args)]
pub struct MatchArgs {
    /// Input file holding the lipid library and the signals (xlsx, xls, ods, csv or tsv).
    /// When omitted, input files in --dir are listed and one is chosen interactively.
    pub input: Option<PathBuf>,

    /// Directory searched for input files when no input is given
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Read signals from a separate file instead of the input file
    #[arg(long)]
    pub signals: Option<PathBuf>,

    /// JSON config file with default overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Half-width of the accepted mass error window in ppm (default 5)
    #[arg(long, allow_negative_numbers = true)]
    pub tolerance_ppm: Option<f64>,

    /// Worksheet holding the lipid library (default: first sheet)
    #[arg(long)]
    pub reference_sheet: Option<String>,

    /// Worksheet holding the signals (default: first sheet)
    #[arg(long)]
    pub signal_sheet: Option<String>,

    /// Metadata rows above the header row, for both tables (default 4)
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Header of the lipid name column (default "Lipid name")
    #[arg(long)]
    pub reference_name_column: Option<String>,

    /// Header of the lipid exact mass column (default "Exact Mass")
    #[arg(long)]
    pub reference_mass_column: Option<String>,

    /// Header of the signal name column (default "Signal name")
    #[arg(long)]
    pub signal_name_column: Option<String>,

    /// Header of the signal mass column (default "Mass")
    #[arg(long)]
    pub signal_mass_column: Option<String>,

    /// Only accept '.' as decimal separator in text cells
    #[arg(long)]
    pub no_decimal_comma: bool,

    /// Decimal places for displayed confidences (default 2)
    #[arg(long)]
    pub decimals: Option<usize>,

    /// Output file (.xlsx, .csv or .tsv); defaults to <output-dir>/Processed_<input>.xlsx
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the default output file (default "Processed"); relative
    /// paths are taken from the input file's folder
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Match signals on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl MatchArgs {
    /// Flag values as config overrides
    fn overrides(&self) -> ConfigFile {
        let decimal_comma = self.no_decimal_comma.then_some(false);

        ConfigFile {
            tolerance_ppm: self.tolerance_ppm,
            parallel: self.sequential.then_some(false),
            decimals: self.decimals,
            output_dir: self.output_dir.clone(),
            references: LayoutOverrides {
                sheet: self.reference_sheet.clone(),
                skip_rows: self.skip_rows,
                name_column: self.reference_name_column.clone(),
                mass_column: self.reference_mass_column.clone(),
                decimal_comma,
            },
            signals: LayoutOverrides {
                sheet: self.signal_sheet.clone(),
                skip_rows: self.skip_rows,
                name_column: self.signal_name_column.clone(),
                mass_column: self.signal_mass_column.clone(),
                decimal_comma,
            },
        }
    }
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the configuration or inputs cannot be loaded, the
/// data fails validation, or the result file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let input = resolve_input(&args)?;

    let references = parsing::load_references(&input, &config.references)
        .with_context(|| format!("Failed to load lipid library from {}", input.display()))?;

    let signals_path = args.signals.as_deref().unwrap_or(&input);
    let signals = parsing::load_signals(signals_path, &config.signals)
        .with_context(|| format!("Failed to load signals from {}", signals_path.display()))?;

    info!(
        "Loaded {} references and {} signals",
        references.len(),
        signals.len()
    );

    let engine = MatchingEngine::with_config(&references, config.matching.clone())?;
    let results = engine.match_all(&signals)?;
    let summary = MatchSummary::from_results(&results);

    let table = ResultTable::from_results(&results, &config.display);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input, &config.output_dir));
    write_table(&table, &output_path)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    info!("Results saved in: {}", output_path.display());

    let run = RunReport {
        input: &input,
        signals_path,
        output: &output_path,
        reference_count: references.len(),
        config: &config,
    };

    match format {
        OutputFormat::Text => print_text_results(&run, &results, &summary, verbose),
        OutputFormat::Json => print_json_results(&run, &results, &summary)?,
        OutputFormat::Tsv => print_tsv_results(&table),
    }

    Ok(())
}

/// Defaults, then the config file, then flags
fn resolve_config(args: &MatchArgs) -> anyhow::Result<RunConfig> {
    let mut config = RunConfig {
        matching: MatchingConfig {
            parallel: true,
            ..MatchingConfig::default()
        },
        ..RunConfig::default()
    };

    if let Some(path) = &args.config {
        let file = ConfigFile::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config.apply(&file);
    }

    config.apply(&args.overrides());
    Ok(config)
}

fn resolve_input(args: &MatchArgs) -> anyhow::Result<PathBuf> {
    if let Some(path) = &args.input {
        return Ok(validate_input_path(path)?);
    }

    // Prompt on stderr so stdout stays clean for json/tsv output
    let stdin = io::stdin();
    let mut selector = PromptSelector::new(stdin.lock(), io::stderr());
    Ok(choose_input(&args.dir, &mut selector)?)
}

struct RunReport<'a> {
    input: &'a Path,
    signals_path: &'a Path,
    output: &'a Path,
    reference_count: usize,
    config: &'a RunConfig,
}

fn print_text_results(
    run: &RunReport<'_>,
    results: &[SignalResult],
    summary: &MatchSummary,
    verbose: bool,
) {
    let decimals = run.config.display.decimals;

    println!("Annotation Results");
    println!("{}", "=".repeat(60));
    println!("\nInput: {}", run.input.display());
    if run.signals_path != run.input {
        println!("Signals: {}", run.signals_path.display());
    }
    println!("  References: {}", run.reference_count);
    println!("  Signals: {}", summary.total_signals);
    println!("  Tolerance: ±{} ppm", run.config.matching.tolerance_ppm);
    println!(
        "  Matched: {} of {} signals ({} candidates)",
        summary.matched_signals, summary.total_signals, summary.total_candidates
    );
    println!("  Output: {}", run.output.display());

    println!();
    for result in results {
        println!("{} ({})", result.signal_name, result.mass);
        if result.is_empty() {
            println!("  no candidate");
            continue;
        }
        for (name, ppm) in result.candidates() {
            println!("  {name}\t{} ppm", format_confidence(ppm, decimals));
        }
    }

    if verbose && !summary.unmatched.is_empty() {
        eprintln!("\n{} signal(s) without candidates:", summary.unmatched.len());
        for warning in &summary.unmatched {
            eprintln!("  {warning}");
        }
    }
}

fn print_json_results(
    run: &RunReport<'_>,
    results: &[SignalResult],
    summary: &MatchSummary,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "input": run.input.display().to_string(),
        "signals_input": run.signals_path.display().to_string(),
        "output": run.output.display().to_string(),
        "reference_count": run.reference_count,
        "tolerance_ppm": run.config.matching.tolerance_ppm,
        "summary": summary,
        "results": results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "signal_name": r.signal_name,
                    "mass": r.mass,
                    "candidates": r
                        .candidates()
                        .map(|(name, ppm)| serde_json::json!({
                            "reference_name": name,
                            "confidence_ppm": ppm,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(table: &ResultTable) {
    for row in table.text_rows() {
        println!("{}", row.join("\t"));
    }
}
