//! Verify command implementation.
//!
//! Checks a previously written list without rewriting it: every entry must
//! parse, already be in canonical form, and the whole list must pass the
//! aggregator's post-conditions.

use anyhow::{Context, Result};
use std::path::Path;

use crate::aggregator::verify_aggregation;
use crate::io::{FileSource, LineSource};
use crate::network::Network;
use crate::parser::{is_comment_or_blank, parse_token};

/// Parse a list strictly: any bad or non-canonical line is an error.
pub fn load_canonical_list(lines: &[String]) -> Result<Vec<Network>> {
    let mut nets = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if is_comment_or_blank(line) {
            continue;
        }
        let net = parse_token(line).with_context(|| format!("line {}", idx + 1))?;
        if net.to_string() != line.trim() {
            anyhow::bail!(
                "line {}: '{}' is not canonical (expected '{}')",
                idx + 1,
                line.trim(),
                net
            );
        }
        nets.push(net);
    }
    Ok(nets)
}

/// Run the verify command
pub fn run(file: &Path) -> Result<()> {
    let lines = FileSource::new(file)
        .read_lines()
        .with_context(|| format!("Failed to read {:?}", file))?;
    let nets = load_canonical_list(&lines).with_context(|| format!("Invalid list {:?}", file))?;
    verify_aggregation(&nets).with_context(|| format!("List {:?} is not aggregated", file))?;

    println!("[OK] {:?}: {} networks, sorted, disjoint, fully merged", file, nets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_canonical_list() {
        let nets = load_canonical_list(&lines(&["# header", "1.2.3.0/24", "", "8.8.8.8/32"])).unwrap();
        assert_eq!(nets.len(), 2);
    }

    #[test]
    fn test_rejects_bare_address() {
        let err = load_canonical_list(&lines(&["8.8.8.8"])).unwrap_err();
        assert!(err.to_string().contains("not canonical"));
    }

    #[test]
    fn test_rejects_host_bits() {
        assert!(load_canonical_list(&lines(&["1.2.3.5/24"])).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let err = load_canonical_list(&lines(&["1.2.3.0/24", "garbage"])).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
