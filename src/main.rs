use clap::Parser;
use tracing_subscriber::EnvFilter;

use lipid_match::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("lipid_match=debug,info")
    } else {
        EnvFilter::new("lipid_match=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Match(args) => {
            cli::annotate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::List(args) => {
            cli::list::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Ppm(args) => {
            cli::ppm::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
