use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::TableKind;
use crate::matching::scoring::{ppm_error, reference_mass_window, within_tolerance};
use crate::matching::DEFAULT_TOLERANCE_PPM;
use crate::utils::validation::{is_valid_mass, validate_tolerance, DataValidationError};

#[derive(Args)]
pub struct PpmArgs {
    /// Observed (signal) mass
    #[arg(required = true, allow_negative_numbers = true)]
    pub observed: f64,

    /// Reference (exact) mass
    #[arg(required = true, allow_negative_numbers = true)]
    pub reference: f64,

    /// Tolerance used for the in-window check
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_PPM, allow_negative_numbers = true)]
    pub tolerance_ppm: f64,
}

/// Execute ppm subcommand
///
/// # Errors
///
/// Returns an error if either mass or the tolerance is invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PpmArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    check_mass(TableKind::Signal, "observed", args.observed)?;
    check_mass(TableKind::Reference, "reference", args.reference)?;
    validate_tolerance(args.tolerance_ppm)?;

    let ppm = ppm_error(args.observed, args.reference);
    let within = within_tolerance(ppm, args.tolerance_ppm);
    let (low, high) = reference_mass_window(args.observed, args.tolerance_ppm);

    match format {
        OutputFormat::Text => {
            println!("{ppm:.4} ppm");
            println!(
                "  {} ±{} ppm (reference window {low:.4} - {high:.4})",
                if within { "within" } else { "outside" },
                args.tolerance_ppm
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "observed": args.observed,
                "reference": args.reference,
                "ppm": ppm,
                "tolerance_ppm": args.tolerance_ppm,
                "within_tolerance": within,
                "reference_window": [low, high],
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("observed\treference\tppm\twithin_tolerance");
            println!("{}\t{}\t{ppm}\t{within}", args.observed, args.reference);
        }
    }

    Ok(())
}

fn check_mass(table: TableKind, name: &str, mass: f64) -> Result<(), DataValidationError> {
    if is_valid_mass(mass) {
        Ok(())
    } else {
        Err(DataValidationError::InvalidMass {
            table,
            position: 1,
            name: name.to_string(),
            mass,
        })
    }
}
