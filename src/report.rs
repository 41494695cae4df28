//! Operator-facing run reports (text, JSON).

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::aggregator::coverage_percent;
use crate::filter::ExclusionPolicy;
use crate::pipeline::RunReport;
use crate::utils::format_with_separator;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

/// Report data structure for JSON serialization
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub exclusions: ExclusionPolicy,
    pub dry_run: bool,
    #[serde(flatten)]
    pub counts: RunReport,
    pub coverage_percent: f64,
}

impl Report {
    pub fn new(source: &str, exclusions: ExclusionPolicy, dry_run: bool, counts: RunReport) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.to_string(),
            exclusions,
            dry_run,
            coverage_percent: coverage_percent(counts.covered_addresses),
            counts,
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn to_text(&self) -> String {
        let c = &self.counts;
        let rows: [(&str, u64); 10] = [
            ("Input lines", c.input_lines as u64),
            ("Ignored (blank/comment)", c.ignored_lines as u64),
            ("Skipped (invalid)", c.skipped_lines as u64),
            ("Parsed networks", c.parsed_networks as u64),
            ("Filtered (reserved)", c.filtered_networks as u64),
            ("Duplicates", c.duplicate_networks as u64),
            ("Unique networks", c.unique_networks as u64),
            ("Merged away", c.merged_networks as u64),
            ("Aggregated networks", c.aggregated_networks as u64),
            ("Addresses covered", c.covered_addresses),
        ];

        let mut out = String::new();
        let _ = writeln!(out, "══════════════════════════════════════════════");
        let _ = writeln!(out, " NETFOLD AGGREGATION REPORT");
        let _ = writeln!(out, "══════════════════════════════════════════════");
        let _ = writeln!(out, " Source: {}", self.source);
        let _ = writeln!(out, " Exclusions: {:?}", self.exclusions);
        if self.dry_run {
            let _ = writeln!(out, " Mode: dry run (nothing written)");
        }
        let _ = writeln!(out, " ──────────────────────────── ────────────────");
        for (label, value) in rows {
            let _ = writeln!(out, " {:<28} {:>16}", label, format_with_separator(value));
        }
        let _ = writeln!(out, " ──────────────────────────── ────────────────");
        let _ = writeln!(
            out,
            " Coverage: {:.4}% of public IPv4 space",
            self.coverage_percent
        );
        let _ = writeln!(
            out,
            " Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        out
    }
}
