//! Configuration management for netfold.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NetfoldError;
use crate::filter::ExclusionPolicy;
use crate::network::Network;
use crate::parser::parse_token;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in exclusion table (core, iana)
    pub exclusions: ExclusionPolicy,

    /// Additional CIDRs to never emit (operator policy)
    pub extra_exclusions: Vec<String>,

    /// Treat blank and `#`/`;` comment lines as ignored rather than invalid
    pub skip_comments: bool,

    /// Abort when more than this fraction of lines fails to parse
    pub max_skipped_ratio: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclusions: ExclusionPolicy::Iana,
            extra_exclusions: Vec::new(),
            skip_comments: true,
            max_skipped_ratio: None,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.checked_extra_exclusions()
            .context("Invalid configuration")?;
        Ok(())
    }

    /// Check every value and return `extra_exclusions` parsed with the same
    /// rules as feed tokens.
    pub fn checked_extra_exclusions(&self) -> Result<Vec<Network>, NetfoldError> {
        if let Some(ratio) = self.max_skipped_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(NetfoldError::Config(format!(
                    "Invalid max_skipped_ratio '{}'. Must be between 0.0 and 1.0",
                    ratio
                )));
            }
        }

        let nets = self
            .extra_exclusions
            .iter()
            .map(|s| parse_token(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nets)
    }
}
