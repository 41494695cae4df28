//! # netfold - minimal CIDR blocklists from threat-intelligence feeds
//!
//! Takes IPv4 addresses and ranges scraped from public feeds and produces the
//! smallest sorted set of CIDR blocks covering exactly the same addresses,
//! ready to install as firewall rules on small network equipment.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        netfold                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: aggregate, verify, check, version          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Exclusion policy, extra exclusions, skip limits      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LineSource ──> Engine ──> LineSink                         │
//! │    ├── Parser: a.b.c.d[/n], non-strict masking              │
//! │    ├── Filter: reserved ranges + exact dedup (NetworkSet)   │
//! │    └── Aggregator: sorted single-pass sibling merge         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Report (serde_json, chrono)                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use netfold::pipeline::Engine;
//!
//! let lines = ["1.2.3.0/25", "1.2.3.128/25", "10.0.0.5", "8.8.8.8", "8.8.8.8"];
//! let outcome = Engine::default().process(lines).unwrap();
//! assert_eq!(outcome.lines(), vec!["1.2.3.0/24", "8.8.8.8/32"]);
//! assert_eq!(outcome.report.filtered_networks, 1);
//! assert_eq!(outcome.report.duplicate_networks, 1);
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - CIDR aggregation and post-condition checks
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Error types
//! - [`filter`] - Reserved-range exclusion and deduplication
//! - [`io`] - Line sources and sinks (files, stdio, memory)
//! - [`network`] - IPv4 CIDR value type
//! - [`parser`] - Feed token parser
//! - [`pipeline`] - The end-to-end engine and run counts
//! - [`report`] - Text and JSON run reports
//! - [`set`] - Exact-equality network set
//! - [`utils`] - Count formatting

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod network;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod set;
pub mod utils;

pub use config::Config;
pub use error::{AggregateError, NetfoldError, ParseError, ParseErrorKind};
pub use network::Network;
pub use pipeline::{Engine, Outcome, RunReport};
pub use set::NetworkSet;
