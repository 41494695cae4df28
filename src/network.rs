//! IPv4 network value type.
//!
//! A [`Network`] is always in canonical form: the host bits below the prefix
//! length are zero. Every constructor masks, so no code path can hold a
//! non-canonical value.

use ipnet::Ipv4Net;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ParseError;

/// Longest IPv4 prefix length.
pub const MAX_PREFIX: u8 = 32;

/// Netmask for a prefix length, e.g. 24 -> 0xFFFF_FF00.
///
/// Prefix lengths above 32 are clamped to 32.
///
/// # Examples
/// ```
/// use netfold::network::mask;
/// assert_eq!(mask(0), 0);
/// assert_eq!(mask(24), 0xFFFF_FF00);
/// assert_eq!(mask(32), u32::MAX);
/// ```
pub fn mask(prefix: u8) -> u32 {
    let host_bits = MAX_PREFIX - prefix.min(MAX_PREFIX);
    // Shifting a u32 by 32 overflows, so go through u64.
    ((u64::from(u32::MAX) >> host_bits) << host_bits) as u32
}

/// An IPv4 CIDR block in canonical network form.
///
/// The derived ordering compares `base` first, then `prefix`, which is the
/// canonical output order: ascending address, and a covering supernet before
/// anything it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Network {
    base: u32,
    prefix: u8,
}

impl Network {
    /// Build a network, clearing any host bits in `addr`.
    ///
    /// Returns `None` if `prefix` exceeds 32.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Option<Self> {
        Self::from_bits(u32::from(addr), prefix)
    }

    /// Same as [`Network::new`] but from the raw 32-bit address.
    pub fn from_bits(bits: u32, prefix: u8) -> Option<Self> {
        if prefix > MAX_PREFIX {
            return None;
        }
        Some(Self {
            base: bits & mask(prefix),
            prefix,
        })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn netmask(&self) -> u32 {
        mask(self.prefix)
    }

    /// First address of the block (same as the base).
    pub fn first(&self) -> u32 {
        self.base
    }

    /// Last address of the block (the broadcast address).
    pub fn last(&self) -> u32 {
        self.base | !self.netmask()
    }

    /// Number of addresses covered, `2^(32 - prefix)`.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_PREFIX - self.prefix)
    }

    /// Whether `other` lies entirely inside this block.
    pub fn contains(&self, other: &Network) -> bool {
        other.prefix >= self.prefix && other.base & self.netmask() == self.base
    }

    pub fn contains_addr(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & self.netmask() == self.base
    }

    /// Whether the two address ranges share at least one address.
    pub fn overlaps(&self, other: &Network) -> bool {
        self.first() <= other.last() && other.first() <= self.last()
    }

    /// The enclosing block one bit shorter, or `None` for `0.0.0.0/0`.
    pub fn parent(&self) -> Option<Network> {
        if self.prefix == 0 {
            return None;
        }
        Self::from_bits(self.base, self.prefix - 1)
    }

    /// The other half of this block's parent, or `None` for `0.0.0.0/0`.
    pub fn sibling(&self) -> Option<Network> {
        if self.prefix == 0 {
            return None;
        }
        let bit = 1u32 << (MAX_PREFIX - self.prefix);
        Some(Self {
            base: self.base ^ bit,
            prefix: self.prefix,
        })
    }

    /// If `self` and `other` are the two halves of one parent, return it.
    pub fn merge_with_sibling(&self, other: &Network) -> Option<Network> {
        match self.sibling() {
            Some(sibling) if sibling == *other => self.parent(),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.prefix)
    }
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_token(s)
    }
}

impl From<Network> for Ipv4Net {
    fn from(net: Network) -> Self {
        // prefix is always <= 32, the fallback is unreachable
        Ipv4Net::new(net.addr(), net.prefix).unwrap_or_else(|_| Ipv4Net::from(net.addr()))
    }
}

impl From<Ipv4Net> for Network {
    fn from(net: Ipv4Net) -> Self {
        let trunc = net.trunc();
        Self {
            base: u32::from(trunc.network()),
            prefix: trunc.prefix_len(),
        }
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
