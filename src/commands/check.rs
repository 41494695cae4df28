//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use crate::io::{FileSource, LineSource};
use crate::network::Network;
use crate::parser::{is_comment_or_blank, parse_token};

/// A list as read for lookups, with the lines that could not be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedList {
    pub networks: Vec<Network>,
    pub skipped_lines: usize,
}

/// Parse every usable entry of `lines`, warning about each line that fails.
pub fn load_list(lines: &[String]) -> LoadedList {
    let mut list = LoadedList::default();
    for (idx, line) in lines.iter().enumerate() {
        if is_comment_or_blank(line) {
            continue;
        }
        match parse_token(line) {
            Ok(net) => list.networks.push(net),
            Err(e) => {
                warn!("Skipping line {}: {}", idx + 1, e);
                list.skipped_lines += 1;
            }
        }
    }
    list
}

/// Entries of `list` that contain `target`.
///
/// On an aggregated list there is at most one.
pub fn find_covering<'a>(list: &'a [Network], target: &Network) -> Vec<&'a Network> {
    list.iter().filter(|net| net.contains(target)).collect()
}

/// Run the check command
pub fn run(addr: &str, file: &Path) -> Result<()> {
    let target = parse_token(addr).with_context(|| format!("Invalid address or CIDR: {}", addr))?;

    let lines = FileSource::new(file)
        .read_lines()
        .with_context(|| format!("Failed to read {:?}", file))?;
    let list = load_list(&lines);

    println!();
    match find_covering(&list.networks, &target).first() {
        Some(net) => println!("{} is BLOCKED by {}", target, net),
        None => println!("{} is NOT blocked", target),
    }
    if list.skipped_lines > 0 {
        println!(
            "[WARN] {} line(s) of {:?} could not be parsed and were not checked",
            list.skipped_lines, file
        );
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Network {
        s.parse().unwrap()
    }

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_covering() {
        let list = vec![net("1.2.3.0/24"), net("8.8.8.8/32")];
        assert_eq!(find_covering(&list, &net("1.2.3.77")), vec![&net("1.2.3.0/24")]);
        assert_eq!(find_covering(&list, &net("1.2.3.128/25")), vec![&net("1.2.3.0/24")]);
        assert!(find_covering(&list, &net("8.8.4.4")).is_empty());
        // A wider query is not "covered" by a narrower entry.
        assert!(find_covering(&list, &net("1.2.0.0/16")).is_empty());
    }

    #[test]
    fn test_load_list_counts_bad_lines() {
        let list = load_list(&lines(&["# header", "1.2.3.0/24 ; SBL1", "", "8.8.8.8/32", "junk"]));
        assert_eq!(list.networks, vec![net("8.8.8.8/32")]);
        assert_eq!(list.skipped_lines, 2);
    }

    #[test]
    fn test_load_list_clean() {
        let list = load_list(&lines(&["1.2.3.0/24", "8.8.8.8"]));
        assert_eq!(list.networks.len(), 2);
        assert_eq!(list.skipped_lines, 0);
    }
}
