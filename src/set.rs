//! Exact-equality set of networks.

use std::collections::HashSet;

use crate::network::Network;

/// Distinct networks awaiting aggregation.
///
/// Membership is exact `(base, prefix)` equality. A /24 and a /32 inside it
/// are two separate entries; resolving containment is the aggregator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSet {
    inner: HashSet<Network>,
}

impl NetworkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a network. Returns `false` if it was already present.
    pub fn insert(&mut self, net: Network) -> bool {
        self.inner.insert(net)
    }

    pub fn contains(&self, net: &Network) -> bool {
        self.inner.contains(net)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Members in canonical `(base, prefix)` order.
    pub fn to_sorted_vec(&self) -> Vec<Network> {
        let mut nets: Vec<Network> = self.inner.iter().copied().collect();
        nets.sort_unstable();
        nets
    }
}

impl FromIterator<Network> for NetworkSet {
    fn from_iter<I: IntoIterator<Item = Network>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
