//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::filter::ExclusionPolicy;

#[derive(Parser)]
#[command(name = "netfold")]
#[command(author, version, about = "Collapse threat-feed IPv4 blocklists into minimal CIDR sets")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only, for cron jobs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output, logs every rejected line)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse, filter and aggregate a list of addresses and ranges
    Aggregate {
        /// Input file, one address or CIDR per line (default: stdin)
        input: Option<PathBuf>,

        /// Output file, written atomically (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the exclusion table from the config file
        #[arg(long, value_enum)]
        exclusions: Option<ExclusionPolicy>,

        /// Compute and report without writing any output
        #[arg(long)]
        dry_run: bool,

        /// Report format written to stderr (text, json)
        #[arg(long, default_value = "text")]
        report: String,
    },

    /// Check that a list is sorted, disjoint and fully merged
    Verify {
        /// Aggregated list to check
        file: PathBuf,
    },

    /// Find which entry of an aggregated list covers an address
    Check {
        /// Address or CIDR to look up
        addr: String,

        /// Aggregated list to search
        file: PathBuf,
    },

    /// Show version
    Version,
}
