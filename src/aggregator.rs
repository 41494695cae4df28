//! CIDR aggregation for blocklists.
//!
//! Collapses a [`NetworkSet`] into the smallest sorted list of CIDR blocks
//! covering exactly the same addresses. For example
//! `[1.2.3.0/25, 1.2.3.128/25]` becomes `[1.2.3.0/24]`.

use tracing::error;

use crate::error::AggregateError;
use crate::network::Network;
use crate::set::NetworkSet;

/// Aggregate a set of networks into minimal canonical form.
///
/// Input is sorted by `(base, prefix)` so a supernet always precedes what it
/// contains, then walked once. The output vector doubles as a stack whose
/// top is the current merged network: contained candidates are dropped,
/// sibling pairs are replaced by their parent, and the replacement is
/// retried against the new top so merges cascade (/25+/25 -> /24, which can
/// then join an earlier /24 into a /23, and so on).
///
/// The result is checked with [`verify_aggregation`] before it is returned.
pub fn aggregate(set: &NetworkSet) -> Result<Vec<Network>, AggregateError> {
    let result = collapse(set.to_sorted_vec())?;
    verify_aggregation(&result)?;
    Ok(result)
}

/// Aggregate networks given in any order, duplicates allowed.
pub fn aggregate_slice(nets: &[Network]) -> Result<Vec<Network>, AggregateError> {
    let set: NetworkSet = nets.iter().copied().collect();
    aggregate(&set)
}

fn collapse(sorted: Vec<Network>) -> Result<Vec<Network>, AggregateError> {
    let mut stack: Vec<Network> = Vec::with_capacity(sorted.len());

    for candidate in sorted {
        if let Some(current) = stack.last() {
            if current.contains(&candidate) {
                continue;
            }
            if current.overlaps(&candidate) {
                // Two valid CIDR blocks are either disjoint or nested.
                return Err(violation(format!(
                    "{} partially overlaps {}",
                    current, candidate
                )));
            }
        }

        let mut merged = candidate;
        while let Some(parent) = stack.last().and_then(|top| top.merge_with_sibling(&merged)) {
            stack.pop();
            merged = parent;
        }
        stack.push(merged);
    }

    Ok(stack)
}

/// Check the post-conditions of an aggregation result.
///
/// Entries must be strictly ascending, pairwise disjoint, and no two
/// neighbours may be siblings that should have merged into their parent.
pub fn verify_aggregation(nets: &[Network]) -> Result<(), AggregateError> {
    for pair in nets.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.base() >= next.base() {
            return Err(violation(format!(
                "{} is not ordered before {}",
                prev, next
            )));
        }
        if prev.overlaps(next) {
            return Err(violation(format!("{} overlaps {}", prev, next)));
        }
        if prev.merge_with_sibling(next).is_some() {
            return Err(violation(format!(
                "{} and {} were left unmerged",
                prev, next
            )));
        }
    }
    Ok(())
}

fn violation(detail: String) -> AggregateError {
    error!("Aggregation invariant violated: {}", detail);
    AggregateError::InvariantViolation(detail)
}

/// Total number of individual addresses covered by a list of networks.
///
/// Overlapping entries are counted twice; call this on aggregated output.
pub fn count_addresses(nets: &[Network]) -> u64 {
    nets.iter().map(Network::size).sum()
}

/// What percentage of the public IPv4 space is covered.
/// Public IPv4 space is approximately 3.7 billion addresses.
pub fn coverage_percent(address_count: u64) -> f64 {
    const PUBLIC_IPV4_APPROX: f64 = 3_700_000_000.0;
    (address_count as f64 / PUBLIC_IPV4_APPROX) * 100.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use ipnet::Ipv4Net;
    use proptest::prelude::*;
    use std::net::Ipv4Addr;

    /// Networks clustered into a small window so merges actually happen
    fn network_strategy() -> impl Strategy<Value = Network> {
        (0u32..4096, 20u8..=32).prop_map(|(offset, prefix)| {
            Network::from_bits(0x0102_0000 | offset, prefix).unwrap()
        })
    }

    fn wide_network_strategy() -> impl Strategy<Value = Network> {
        (any::<u32>(), 0u8..=32).prop_map(|(bits, prefix)| Network::from_bits(bits, prefix).unwrap())
    }

    fn network_vec_strategy(max_size: usize) -> impl Strategy<Value = Vec<Network>> {
        prop::collection::vec(
            prop_oneof![3 => network_strategy(), 1 => wide_network_strategy()],
            0..max_size,
        )
    }

    fn covered(nets: &[Network], addr: u32) -> usize {
        nets.iter()
            .filter(|n| n.contains_addr(Ipv4Addr::from(addr)))
            .count()
    }

    proptest! {
        /// Same result as ipnet's independent implementation
        #[test]
        fn prop_matches_ipnet(input in network_vec_strategy(100)) {
            let ours = aggregate_slice(&input).unwrap();
            let v4: Vec<Ipv4Net> = input.iter().map(|n| Ipv4Net::from(*n)).collect();
            let mut theirs: Vec<Network> = Ipv4Net::aggregate(&v4).into_iter().map(Network::from).collect();
            theirs.sort();
            prop_assert_eq!(ours, theirs);
        }

        /// Re-aggregating the output is a no-op
        #[test]
        fn prop_idempotent(input in network_vec_strategy(100)) {
            let once = aggregate_slice(&input).unwrap();
            let twice = aggregate_slice(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Output passes its own post-condition check
        #[test]
        fn prop_output_is_canonical(input in network_vec_strategy(100)) {
            let result = aggregate_slice(&input).unwrap();
            prop_assert!(verify_aggregation(&result).is_ok());
            prop_assert!(result.len() <= input.len());
        }

        /// Every input address is covered by exactly one output network
        #[test]
        fn prop_exact_single_coverage(input in network_vec_strategy(50), probe in 0u32..4096) {
            let result = aggregate_slice(&input).unwrap();
            for net in &input {
                prop_assert_eq!(covered(&result, net.first()), 1);
                prop_assert_eq!(covered(&result, net.last()), 1);
            }
            let addr = 0x0102_0000 | probe;
            let in_input = covered(&input, addr) > 0;
            prop_assert_eq!(covered(&result, addr), usize::from(in_input));
        }

        /// Input order never changes the result
        #[test]
        fn prop_order_independent(input in network_vec_strategy(60)) {
            let mut reversed = input.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate_slice(&input).unwrap(), aggregate_slice(&reversed).unwrap());
        }

        /// Address count is preserved for disjoint host inputs
        #[test]
        fn prop_host_count_preserved(offsets in prop::collection::hash_set(0u32..2048, 0..200)) {
            let hosts: Vec<Network> = offsets
                .iter()
                .map(|o| Network::from_bits(0x0505_0000 | o, 32).unwrap())
                .collect();
            let result = aggregate_slice(&hosts).unwrap();
            prop_assert_eq!(count_addresses(&result), hosts.len() as u64);
        }
    }
}
