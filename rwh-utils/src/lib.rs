//! Shared utility functions for RWH crates.

/// Lenient numeric parsing for raw form values.
///
/// Form fields arrive as free text. These helpers read the longest numeric
/// prefix the way a browser form would (`"120 sq m"` reads as 120) and never
/// fail: anything unreadable comes back as `None` and callers coerce it to 0.
pub mod coerce {
    fn count_digits(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    fn sign_len(bytes: &[u8]) -> usize {
        match bytes.first() {
            Some(b'+') | Some(b'-') => 1,
            _ => 0,
        }
    }

    /// Parse the longest decimal prefix of `s` (after leading whitespace).
    ///
    /// Accepts an optional sign, digits with an optional fractional part, an
    /// optional exponent and the literal `Infinity`.
    pub fn parse_float_prefix(s: &str) -> Option<f64> {
        let s = s.trim_start();
        let bytes = s.as_bytes();
        let mut end = sign_len(bytes);

        if s[end..].starts_with("Infinity") {
            let negative = bytes.first() == Some(&b'-');
            return Some(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }

        let int_digits = count_digits(&bytes[end..]);
        end += int_digits;

        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            frac_digits = count_digits(&bytes[end + 1..]);
            if int_digits > 0 || frac_digits > 0 {
                end += 1 + frac_digits;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }

        if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp_end = end + 1;
            exp_end += sign_len(&bytes[exp_end..]);
            let exp_digits = count_digits(&bytes[exp_end..]);
            if exp_digits > 0 {
                end = exp_end + exp_digits;
            }
        }

        s[..end].parse::<f64>().ok()
    }

    /// Parse the longest base-10 integer prefix of `s` (after leading whitespace).
    ///
    /// `"4.7"` reads as 4 and `"3 people"` reads as 3.
    pub fn parse_int_prefix(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let bytes = s.as_bytes();
        let sign = sign_len(bytes);
        let digits = count_digits(&bytes[sign..]);
        if digits == 0 {
            return None;
        }
        s[..sign + digits].parse::<i64>().ok()
    }

    /// A non-negative, finite quantity read from an optional form value.
    pub fn quantity_or_zero(raw: Option<&str>) -> f64 {
        non_negative(raw.and_then(parse_float_prefix).unwrap_or(0.0))
    }

    /// A non-negative whole count read from an optional form value.
    pub fn count_or_zero(raw: Option<&str>) -> u32 {
        raw.and_then(parse_int_prefix)
            .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(0)
    }

    /// Clamp a value to `[0, +inf)`, mapping NaN and infinities to 0.
    pub fn non_negative(value: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }

    /// Clamp a derived quantity to `[0, f64::MAX]`.
    ///
    /// Products of large finite inputs can overflow: `+inf` saturates to
    /// `f64::MAX`, NaN and negatives become 0.
    pub fn saturating_non_negative(value: f64) -> f64 {
        if value.is_nan() || value <= 0.0 {
            0.0
        } else {
            value.min(f64::MAX)
        }
    }

    /// Clamp a value to `[0, 1]`. NaN maps to `None`; infinities clamp to
    /// the nearest bound.
    pub fn unit_fraction(value: f64) -> Option<f64> {
        if value.is_nan() {
            None
        } else {
            Some(value.clamp(0.0, 1.0))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_float_prefix() {
            assert_eq!(parse_float_prefix("120"), Some(120.0));
            assert_eq!(parse_float_prefix("  12.5 sq m"), Some(12.5));
            assert_eq!(parse_float_prefix(".5"), Some(0.5));
            assert_eq!(parse_float_prefix("-3"), Some(-3.0));
            assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
            assert_eq!(parse_float_prefix("7e"), Some(7.0));
            assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        }

        #[test]
        fn test_parse_float_prefix_garbage() {
            assert_eq!(parse_float_prefix(""), None);
            assert_eq!(parse_float_prefix("abc"), None);
            assert_eq!(parse_float_prefix("."), None);
            assert_eq!(parse_float_prefix("-"), None);
        }

        #[test]
        fn test_parse_int_prefix() {
            assert_eq!(parse_int_prefix("4"), Some(4));
            assert_eq!(parse_int_prefix("4.7"), Some(4));
            assert_eq!(parse_int_prefix(" 3 people"), Some(3));
            assert_eq!(parse_int_prefix("-2"), Some(-2));
            assert_eq!(parse_int_prefix("people"), None);
        }

        #[test]
        fn test_quantity_and_count_clamp() {
            assert_eq!(quantity_or_zero(None), 0.0);
            assert_eq!(quantity_or_zero(Some("-40")), 0.0);
            assert_eq!(quantity_or_zero(Some("Infinity")), 0.0);
            assert_eq!(quantity_or_zero(Some("50")), 50.0);
            assert_eq!(count_or_zero(Some("-1")), 0);
            assert_eq!(count_or_zero(Some("six")), 0);
            assert_eq!(count_or_zero(Some("6")), 6);
        }

        #[test]
        fn test_unit_fraction() {
            assert_eq!(unit_fraction(0.85), Some(0.85));
            assert_eq!(unit_fraction(1.4), Some(1.0));
            assert_eq!(unit_fraction(-0.2), Some(0.0));
            assert_eq!(unit_fraction(f64::NAN), None);
            assert_eq!(unit_fraction(f64::INFINITY), Some(1.0));
            assert_eq!(unit_fraction(f64::NEG_INFINITY), Some(0.0));
        }

        #[test]
        fn test_saturating_non_negative() {
            assert_eq!(saturating_non_negative(76_500.0), 76_500.0);
            assert_eq!(saturating_non_negative(f64::INFINITY), f64::MAX);
            assert_eq!(saturating_non_negative(f64::NAN), 0.0);
            assert_eq!(saturating_non_negative(f64::NEG_INFINITY), 0.0);
            assert_eq!(saturating_non_negative(-1.0), 0.0);
        }
    }
}

/// Number formatting for dashboard readouts.
pub mod format {
    /// Group the digits of an integer string the Indian way: the last three
    /// digits, then pairs (`1234567` -> `12,34,567`).
    fn group_indian(digits: &str) -> String {
        if digits.len() <= 3 {
            return digits.to_string();
        }
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    }

    /// Format a number with Indian digit grouping and at most
    /// `max_fraction_digits` decimals (trailing zeros dropped).
    ///
    /// Non-finite values render as `"N/A"`.
    pub fn format_indian(value: f64, max_fraction_digits: usize) -> String {
        if !value.is_finite() {
            return "N/A".to_string();
        }
        let rendered = format!("{:.*}", max_fraction_digits, value.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i, f.trim_end_matches('0')),
            None => (rendered.as_str(), ""),
        };
        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
        let sign = if value < 0.0 && !is_zero { "-" } else { "" };
        let grouped = group_indian(int_part);
        if frac_part.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped}.{frac_part}")
        }
    }

    /// Format a whole-liter volume (`63750.0` -> `63,750`).
    pub fn format_liters(liters: f64) -> String {
        format_indian(liters, 0)
    }

    /// Format a currency amount with the rupee sign and two decimals at most.
    pub fn format_currency(amount: f64) -> String {
        if !amount.is_finite() {
            return "N/A".to_string();
        }
        format!("\u{20b9}{}", format_indian(amount, 2))
    }

}
