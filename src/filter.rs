//! Reserved-range filtering and exact deduplication.
//!
//! A network is dropped only when it sits entirely inside an exclusion
//! prefix. A broader network that merely overlaps reserved space (say
//! `172.0.0.0/8`) is kept; deciding what to do with it is operator policy.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::network::Network;
use crate::set::NetworkSet;

/// Ranges that are never valid blocklist targets.
const CORE_RESERVED: &[([u8; 4], u8)] = &[
    ([0, 0, 0, 0], 8),      // "this network"
    ([10, 0, 0, 0], 8),     // RFC 1918
    ([127, 0, 0, 0], 8),    // loopback
    ([172, 16, 0, 0], 12),  // RFC 1918
    ([192, 168, 0, 0], 16), // RFC 1918
];

/// Remainder of the IANA IPv4 special-purpose registry.
const IANA_SPECIAL_USE: &[([u8; 4], u8)] = &[
    ([100, 64, 0, 0], 10),   // shared address space (CGN)
    ([169, 254, 0, 0], 16),  // link-local
    ([192, 0, 0, 0], 24),    // IETF protocol assignments
    ([192, 0, 2, 0], 24),    // TEST-NET-1
    ([192, 31, 196, 0], 24), // AS112-v4
    ([192, 52, 193, 0], 24), // AMT
    ([192, 88, 99, 0], 24),  // deprecated 6to4 relay anycast
    ([192, 175, 48, 0], 24), // direct delegation AS112
    ([198, 18, 0, 0], 15),   // benchmarking
    ([198, 51, 100, 0], 24), // TEST-NET-2
    ([203, 0, 113, 0], 24),  // TEST-NET-3
    ([224, 0, 0, 0], 4),     // multicast
    ([240, 0, 0, 0], 4),     // reserved, includes limited broadcast
];

/// Which built-in exclusion table to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionPolicy {
    /// Private, loopback and "this network" only
    Core,
    /// Core plus the full IANA special-use registry
    #[default]
    Iana,
}

/// Fixed list of prefixes a network must not fall inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTable {
    entries: Vec<Network>,
}

impl ExclusionTable {
    pub fn for_policy(policy: ExclusionPolicy) -> Self {
        let special_use: &[([u8; 4], u8)] = match policy {
            ExclusionPolicy::Core => &[],
            ExclusionPolicy::Iana => IANA_SPECIAL_USE,
        };
        let entries = CORE_RESERVED
            .iter()
            .chain(special_use)
            .filter_map(|(octets, prefix)| Network::new(Ipv4Addr::from(*octets), *prefix))
            .collect();
        Self { entries }
    }

    /// Add operator-supplied exclusions on top of the built-in table.
    pub fn with_extra<I: IntoIterator<Item = Network>>(mut self, extra: I) -> Self {
        self.entries.extend(extra);
        self
    }

    /// The exclusion prefix that fully contains `net`, if any.
    pub fn excluded_by(&self, net: &Network) -> Option<&Network> {
        self.entries.iter().find(|exclusion| exclusion.contains(net))
    }

    pub fn is_excluded(&self, net: &Network) -> bool {
        self.excluded_by(net).is_some()
    }
}

impl Default for ExclusionTable {
    fn default() -> Self {
        Self::for_policy(ExclusionPolicy::default())
    }
}

/// Counts produced by [`filter_and_dedup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub seen: usize,
    pub filtered: usize,
    pub duplicates: usize,
}

/// Drop excluded networks and collapse exact duplicates into a set.
pub fn filter_and_dedup<I>(nets: I, table: &ExclusionTable) -> (NetworkSet, FilterStats)
where
    I: IntoIterator<Item = Network>,
{
    let mut set = NetworkSet::new();
    let mut stats = FilterStats::default();

    for net in nets {
        stats.seen += 1;
        if let Some(exclusion) = table.excluded_by(&net) {
            debug!("Dropping {} (inside reserved {})", net, exclusion);
            stats.filtered += 1;
        } else if !set.insert(net) {
            stats.duplicates += 1;
        }
    }

    (set, stats)
}
