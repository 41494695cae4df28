//! Error types for netfold.
//!
//! Two very different failure classes flow through the engine:
//! [`ParseError`] is per-line and always absorbed by the caller, while
//! [`AggregateError::InvariantViolation`] aborts the run before any output
//! is written.

use thiserror::Error;

/// Why a single token was rejected by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("empty token")]
    Empty,

    #[error("expected 4 octets, found {0}")]
    OctetCount(usize),

    #[error("invalid octet '{0}'")]
    InvalidOctet(String),

    #[error("octet '{0}' out of range (0-255)")]
    OctetOutOfRange(String),

    #[error("missing prefix length after '/'")]
    MissingPrefix,

    #[error("invalid prefix length '{0}'")]
    InvalidPrefix(String),

    #[error("prefix length '{0}' out of range (0-32)")]
    PrefixOutOfRange(String),
}

/// A token that could not be turned into a [`crate::network::Network`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse '{token}': {kind}")]
pub struct ParseError {
    pub token: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(token: &str, kind: ParseErrorKind) -> Self {
        Self {
            token: token.to_string(),
            kind,
        }
    }
}

/// Failures raised by the aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Error, Debug)]
pub enum NetfoldError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Too many invalid lines: {skipped} of {considered} exceeds ratio {max_ratio}")]
    TooManySkipped {
        skipped: usize,
        considered: usize,
        max_ratio: f64,
    },

    #[error("Invalid network: {0}")]
    InvalidNetwork(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("999.1.1.1", ParseErrorKind::OctetOutOfRange("999".into()));
        assert_eq!(
            err.to_string(),
            "cannot parse '999.1.1.1': octet '999' out of range (0-255)"
        );
    }

    #[test]
    fn test_invariant_violation_is_transparent() {
        let err: NetfoldError =
            AggregateError::InvariantViolation("1.0.0.0/8 overlaps 1.2.0.0/15".into()).into();
        assert_eq!(
            err.to_string(),
            "invariant violation: 1.0.0.0/8 overlaps 1.2.0.0/15"
        );
    }
}
