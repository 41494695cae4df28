//! Aggregate command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;
use crate::filter::ExclusionPolicy;
use crate::io::{FileSink, FileSource, LineSink, LineSource, StdinSource, StdoutSink};
use crate::pipeline::Engine;
use crate::report::{Report, ReportFormat};
use crate::utils::format_count;

/// Options for one aggregate run
pub struct AggregateArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub exclusions: Option<ExclusionPolicy>,
    pub dry_run: bool,
    pub report: ReportFormat,
}

/// Run the aggregate command
pub fn run(args: AggregateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(policy) = args.exclusions {
        config.exclusions = policy;
    }

    let engine = Engine::new(&config).context("Invalid engine configuration")?;

    let source: Box<dyn LineSource> = match &args.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(StdinSource),
    };
    let source_name = args
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());

    info!("Aggregating {}...", source_name);

    let counts = if args.dry_run {
        engine
            .evaluate(source.as_ref())
            .with_context(|| format!("Failed to aggregate {}", source_name))?
            .report
    } else {
        let sink: Box<dyn LineSink> = match &args.output {
            Some(path) => Box::new(FileSink::new(path)),
            None => Box::new(StdoutSink),
        };
        engine
            .run(source.as_ref(), sink.as_ref())
            .map_err(|e| {
                error!("Aborting, no output written: {}", e);
                e
            })
            .with_context(|| format!("Failed to aggregate {}", source_name))?
    };

    info!(
        "[OK] {} ranges from {} networks ({} lines skipped)",
        format_count(counts.aggregated_networks),
        format_count(counts.parsed_networks),
        format_count(counts.skipped_lines)
    );

    let report = Report::new(&source_name, config.exclusions, args.dry_run, counts);
    eprint!("{}", report.render(args.report)?);

    Ok(())
}
