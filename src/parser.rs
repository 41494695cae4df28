//! Token parser for feed lines.
//!
//! Accepts `a.b.c.d` (a /32) and `a.b.c.d/n`. Parsing is non-strict: host
//! bits below the prefix are masked off, so `1.2.3.5/24` yields `1.2.3.0/24`.
//! Octets and prefixes are always read as decimal; leading zeros are
//! dropped, never interpreted as octal (`010` is ten).

use std::net::Ipv4Addr;

use crate::error::{ParseError, ParseErrorKind};
use crate::network::{Network, MAX_PREFIX};

/// Parse one token into a canonical [`Network`].
///
/// Surrounding whitespace is ignored; anything else that does not match the
/// grammar is rejected.
///
/// # Examples
/// ```
/// use netfold::parser::parse_token;
/// assert_eq!(parse_token("8.8.8.8").unwrap().to_string(), "8.8.8.8/32");
/// assert_eq!(parse_token("1.2.3.5/24").unwrap().to_string(), "1.2.3.0/24");
/// assert_eq!(parse_token("010.002.003.004").unwrap().to_string(), "10.2.3.4/32");
/// assert!(parse_token("999.1.1.1").is_err());
/// assert!(parse_token("1.2.3.4/33").is_err());
/// ```
pub fn parse_token(token: &str) -> Result<Network, ParseError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(token, ParseErrorKind::Empty));
    }

    let (addr_part, prefix_part) = match trimmed.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (trimmed, None),
    };

    let addr = parse_address(addr_part).map_err(|kind| ParseError::new(token, kind))?;

    let prefix = match prefix_part {
        Some(p) => parse_prefix(p).map_err(|kind| ParseError::new(token, kind))?,
        None => MAX_PREFIX,
    };

    // parse_prefix already bounds the prefix
    Network::new(addr, prefix).ok_or_else(|| {
        ParseError::new(token, ParseErrorKind::PrefixOutOfRange(prefix.to_string()))
    })
}

/// Whether a feed line carries no token at all (blank or `#`/`;` comment).
pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
}

fn parse_address(text: &str) -> Result<Ipv4Addr, ParseErrorKind> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(ParseErrorKind::OctetCount(parts.len()));
    }

    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        let value =
            parse_decimal(part).ok_or_else(|| ParseErrorKind::InvalidOctet(part.to_string()))?;
        *slot = u8::try_from(value)
            .map_err(|_| ParseErrorKind::OctetOutOfRange(part.to_string()))?;
    }

    Ok(Ipv4Addr::from(octets))
}

fn parse_prefix(text: &str) -> Result<u8, ParseErrorKind> {
    if text.is_empty() {
        return Err(ParseErrorKind::MissingPrefix);
    }
    let value = parse_decimal(text).ok_or_else(|| ParseErrorKind::InvalidPrefix(text.to_string()))?;
    if value > u32::from(MAX_PREFIX) {
        return Err(ParseErrorKind::PrefixOutOfRange(text.to_string()));
    }
    Ok(value as u8)
}

/// Plain ASCII decimal digits, leading zeros allowed. Saturates instead of
/// overflowing so long digit runs still land in the out-of-range bucket.
fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(token: &str) -> ParseErrorKind {
        parse_token(token).unwrap_err().kind
    }

    #[test]
    fn test_parse_bare_address() {
        let n = parse_token("8.8.8.8").unwrap();
        assert_eq!(n.addr(), Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(n.prefix(), 32);
    }

    #[test]
    fn test_parse_cidr() {
        let n = parse_token("192.0.2.0/24").unwrap();
        assert_eq!(n.to_string(), "192.0.2.0/24");
    }

    #[test]
    fn test_non_strict_masking() {
        assert_eq!(parse_token("1.2.3.5/24").unwrap().to_string(), "1.2.3.0/24");
        assert_eq!(parse_token("255.255.255.255/0").unwrap().to_string(), "0.0.0.0/0");
        assert_eq!(parse_token("10.1.2.3/8").unwrap().to_string(), "10.0.0.0/8");
    }

    #[test]
    fn test_leading_zeros_are_decimal() {
        assert_eq!(
            parse_token("010.002.003.004").unwrap().to_string(),
            "10.2.3.4/32"
        );
        assert_eq!(parse_token("1.2.3.007").unwrap().to_string(), "1.2.3.7/32");
        // "08" and "09" would be invalid octal; they are plain decimal here.
        assert_eq!(parse_token("08.09.0.0").unwrap().to_string(), "8.9.0.0/32");
        assert_eq!(parse_token("1.2.3.0/024").unwrap().to_string(), "1.2.3.0/24");
        assert_eq!(parse_token("0000255.0.0.0").unwrap().to_string(), "255.0.0.0/32");
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_token("  8.8.8.8\t").unwrap().to_string(), "8.8.8.8/32");
        assert_eq!(parse_token("8.8.8.8\r").unwrap().to_string(), "8.8.8.8/32");
    }

    #[test]
    fn test_octet_out_of_range() {
        assert_eq!(
            kind("999.1.1.1"),
            ParseErrorKind::OctetOutOfRange("999".into())
        );
        assert_eq!(
            kind("1.1.1.256"),
            ParseErrorKind::OctetOutOfRange("256".into())
        );
        assert_eq!(
            kind("1.1.1.99999999999999999999"),
            ParseErrorKind::OctetOutOfRange("99999999999999999999".into())
        );
    }

    #[test]
    fn test_prefix_out_of_range() {
        assert_eq!(
            kind("1.2.3.4/33"),
            ParseErrorKind::PrefixOutOfRange("33".into())
        );
    }

    #[test]
    fn test_malformed_prefix() {
        assert_eq!(kind("1.2.3.4/"), ParseErrorKind::MissingPrefix);
        assert_eq!(kind("1.2.3.4/-1"), ParseErrorKind::InvalidPrefix("-1".into()));
        assert_eq!(kind("1.2.3.4/+8"), ParseErrorKind::InvalidPrefix("+8".into()));
        assert_eq!(kind("1.2.3.4/24/8"), ParseErrorKind::InvalidPrefix("24/8".into()));
        assert_eq!(
            kind("1.2.3.4/255.255.255.0"),
            ParseErrorKind::InvalidPrefix("255.255.255.0".into())
        );
    }

    #[test]
    fn test_wrong_octet_count() {
        assert_eq!(kind("1.2.3"), ParseErrorKind::OctetCount(3));
        assert_eq!(kind("1.2.3.4.5"), ParseErrorKind::OctetCount(5));
        assert_eq!(kind("hello"), ParseErrorKind::OctetCount(1));
        assert_eq!(kind("/24"), ParseErrorKind::OctetCount(1));
    }

    #[test]
    fn test_trailing_garbage() {
        assert_eq!(kind("1.2.3.4x"), ParseErrorKind::InvalidOctet("4x".into()));
        assert_eq!(
            kind("1.2.3.4 # comment"),
            ParseErrorKind::InvalidOctet("4 # comment".into())
        );
        assert_eq!(kind("1.2..4"), ParseErrorKind::InvalidOctet("".into()));
        assert_eq!(kind("-1.0.0.0"), ParseErrorKind::InvalidOctet("-1".into()));
        assert_eq!(kind("::1"), ParseErrorKind::OctetCount(1));
    }

    #[test]
    fn test_empty() {
        assert_eq!(kind(""), ParseErrorKind::Empty);
        assert_eq!(kind("   "), ParseErrorKind::Empty);
    }

    #[test]
    fn test_error_keeps_original_token() {
        let err = parse_token(" 1.2.3.4/33 ").unwrap_err();
        assert_eq!(err.token, " 1.2.3.4/33 ");
    }

    #[test]
    fn test_is_comment_or_blank() {
        assert!(is_comment_or_blank(""));
        assert!(is_comment_or_blank("   "));
        assert!(is_comment_or_blank("# FireHOL level1"));
        assert!(is_comment_or_blank("  ; Spamhaus DROP"));
        assert!(!is_comment_or_blank("1.2.3.4"));
        assert!(!is_comment_or_blank("garbage"));
    }
}
