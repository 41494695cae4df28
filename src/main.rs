//! netfold - minimal CIDR blocklists from threat-intelligence feeds.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use netfold::cli::{Cli, Commands};
use netfold::commands::aggregate::AggregateArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // stdout is reserved for CIDR output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Aggregate {
            input,
            output,
            exclusions,
            dry_run,
            report,
        } => {
            let report = report.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            netfold::commands::aggregate::run(
                AggregateArgs {
                    input,
                    output,
                    exclusions,
                    dry_run,
                    report,
                },
                config_path,
            )
        }
        Commands::Verify { file } => netfold::commands::verify::run(&file),
        Commands::Check { addr, file } => netfold::commands::check::run(&addr, &file),
        Commands::Version => {
            println!("netfold {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
