//! Count formatting shared by logging and reports.

/// Format a count with K/M suffix for compact log lines.
///
/// # Examples
/// ```
/// use netfold::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(1500), "1.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format a number with thousands separators for report tables.
///
/// # Examples
/// ```
/// use netfold::utils::format_with_separator;
/// assert_eq!(format_with_separator(1000), "1,000");
/// assert_eq!(format_with_separator(4_294_967_296), "4,294,967,296");
/// ```
pub fn format_with_separator(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(999_999), "1000.0K");
        assert_eq!(format_count(1_000_000), "1.0M");
    }

    #[test]
    fn test_format_with_separator() {
        assert_eq!(format_with_separator(0), "0");
        assert_eq!(format_with_separator(42), "42");
        assert_eq!(format_with_separator(999), "999");
        assert_eq!(format_with_separator(1000), "1,000");
        assert_eq!(format_with_separator(12345), "12,345");
        assert_eq!(format_with_separator(123456), "123,456");
        assert_eq!(format_with_separator(1234567), "1,234,567");
        assert_eq!(format_with_separator(1u64 << 32), "4,294,967,296");
    }
}
