//! Parse -> filter/dedup -> aggregate, as one straight-line run.
//!
//! The run is single-threaded and synchronous. Parse failures are counted
//! and logged per line; an invariant violation aborts before the sink sees
//! anything.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate, count_addresses};
use crate::config::Config;
use crate::error::NetfoldError;
use crate::filter::{filter_and_dedup, ExclusionTable};
use crate::io::{LineSink, LineSource};
use crate::network::Network;
use crate::parser::{is_comment_or_blank, parse_token};
use crate::utils::format_count;

/// Counts for operator reporting.
///
/// `input_lines = ignored_lines + skipped_lines + parsed_networks` and
/// `parsed_networks = filtered_networks + duplicate_networks + unique_networks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input_lines: usize,
    pub ignored_lines: usize,
    pub skipped_lines: usize,
    pub parsed_networks: usize,
    pub filtered_networks: usize,
    pub duplicate_networks: usize,
    pub unique_networks: usize,
    pub aggregated_networks: usize,
    /// Distinct networks absorbed into a supernet or merged with a sibling.
    pub merged_networks: usize,
    pub covered_addresses: u64,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub networks: Vec<Network>,
    pub report: RunReport,
}

impl Outcome {
    /// Output lines in canonical `a.b.c.d/n` form.
    pub fn lines(&self) -> Vec<String> {
        self.networks.iter().map(ToString::to_string).collect()
    }
}

/// The aggregation engine, configured once and reusable across runs.
#[derive(Debug, Clone)]
pub struct Engine {
    table: ExclusionTable,
    skip_comments: bool,
    max_skipped_ratio: Option<f64>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            table: ExclusionTable::default(),
            skip_comments: true,
            max_skipped_ratio: None,
        }
    }
}

impl Engine {
    pub fn new(config: &Config) -> Result<Self, NetfoldError> {
        let extra = config.checked_extra_exclusions()?;

        Ok(Self {
            table: ExclusionTable::for_policy(config.exclusions).with_extra(extra),
            skip_comments: config.skip_comments,
            max_skipped_ratio: config.max_skipped_ratio,
        })
    }

    pub fn with_table(table: ExclusionTable) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    /// Run the pure pipeline over a sequence of lines.
    pub fn process<I, S>(&self, lines: I) -> Result<Outcome, NetfoldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut input_lines = 0usize;
        let mut ignored_lines = 0usize;
        let mut skipped_lines = 0usize;

        let parsed = lines.into_iter().enumerate().filter_map(|(idx, line)| {
            let line = line.as_ref();
            input_lines += 1;
            if self.skip_comments && is_comment_or_blank(line) {
                ignored_lines += 1;
                return None;
            }
            match parse_token(line) {
                Ok(net) => Some(net),
                Err(e) => {
                    debug!("Skipping line {}: {}", idx + 1, e);
                    skipped_lines += 1;
                    None
                }
            }
        });

        let (set, stats) = filter_and_dedup(parsed, &self.table);

        info!(
            "Parsed {} networks from {} lines ({} skipped, {} ignored)",
            format_count(stats.seen),
            format_count(input_lines),
            format_count(skipped_lines),
            format_count(ignored_lines)
        );
        info!(
            "Filtered {} reserved, {} duplicates, {} unique",
            format_count(stats.filtered),
            format_count(stats.duplicates),
            format_count(set.len())
        );

        self.check_skipped_ratio(skipped_lines, input_lines - ignored_lines)?;

        let networks = aggregate(&set)?;

        let report = RunReport {
            input_lines,
            ignored_lines,
            skipped_lines,
            parsed_networks: stats.seen,
            filtered_networks: stats.filtered,
            duplicate_networks: stats.duplicates,
            unique_networks: set.len(),
            aggregated_networks: networks.len(),
            merged_networks: set.len() - networks.len(),
            covered_addresses: count_addresses(&networks),
        };

        info!(
            "Aggregated {} networks -> {} ranges",
            format_count(report.unique_networks),
            format_count(report.aggregated_networks)
        );

        Ok(Outcome { networks, report })
    }

    /// Read every line from `source`, run the pipeline, and write the result.
    ///
    /// `sink` is only touched after the whole run has succeeded.
    pub fn run(
        &self,
        source: &dyn LineSource,
        sink: &dyn LineSink,
    ) -> Result<RunReport, NetfoldError> {
        let outcome = self.evaluate(source)?;
        sink.write_lines(&outcome.lines())?;
        Ok(outcome.report)
    }

    /// Read and process without writing anywhere.
    pub fn evaluate(&self, source: &dyn LineSource) -> Result<Outcome, NetfoldError> {
        let lines = source.read_lines()?;
        self.process(lines)
    }

    fn check_skipped_ratio(&self, skipped: usize, considered: usize) -> Result<(), NetfoldError> {
        let Some(max_ratio) = self.max_skipped_ratio else {
            return Ok(());
        };
        if considered == 0 {
            return Ok(());
        }
        let ratio = skipped as f64 / considered as f64;
        if ratio > max_ratio {
            warn!(
                "{} of {} lines failed to parse (limit {:.0}%)",
                skipped,
                considered,
                max_ratio * 100.0
            );
            return Err(NetfoldError::TooManySkipped {
                skipped,
                considered,
                max_ratio,
            });
        }
        Ok(())
    }
}
