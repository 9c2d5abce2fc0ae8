//! Value conversions used by the section handlers.
//!
//! Numbers are parsed leniently: take the
//! longest numeric prefix after leading whitespace and fall back to zero
//! when there is none. Range checks happen later, in the validator.

/// Parses a yes/no flag. Accepts `yes`/`no` in any case, or `1`/`0`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("yes") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("no") || value == "0" {
        Some(false)
    } else {
        None
    }
}

/// Best-effort 64-bit integer; out-of-range values saturate.
#[must_use]
pub fn parse_long(value: &str) -> i64 {
    let digits = integer_prefix(value);
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Best-effort 32-bit integer; out-of-range values saturate.
#[must_use]
pub fn parse_int(value: &str) -> i32 {
    let wide = parse_long(value);
    i32::try_from(wide).unwrap_or(if wide < 0 { i32::MIN } else { i32::MAX })
}

/// Best-effort floating point number.
#[must_use]
pub fn parse_float(value: &str) -> f64 {
    let number = float_prefix(value);
    if number.is_empty() {
        return 0.0;
    }
    number.parse::<f64>().unwrap_or(0.0)
}

/// Best-effort single-precision number.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_f32(value: &str) -> f32 {
    parse_float(value) as f32
}

/// A percentage stored as a fraction, e.g. `70` becomes `0.7`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_percent(value: &str) -> f32 {
    (parse_float(value) * 0.01) as f32
}

/// Converts a one-based cycle position to a zero-based offset.
#[must_use]
pub fn parse_one_based(value: &str) -> i32 {
    parse_int(value).saturating_sub(1)
}

/// Whether `text` starts with `prefix`, ignoring ASCII case.
#[must_use]
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn integer_prefix(value: &str) -> &str {
    let text = value.trim_start();
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = sign + count_digits(&bytes[sign..]);
    if end == sign {
        ""
    } else {
        &text[..end]
    }
}

fn float_prefix(value: &str) -> &str {
    let text = value.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

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
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    &text[..end]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("true"), None);
        assert_eq!(parse_bool(" yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  17 cycles"), 17);
        assert_eq!(parse_int("-3"), -3);
        assert_eq!(parse_int("+8"), 8);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int("-"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("12.9"), 12);
    }

    #[test]
    fn test_parse_int_saturates() {
        assert_eq!(parse_int("99999999999"), i32::MAX);
        assert_eq!(parse_int("-99999999999"), i32::MIN);
        assert_eq!(parse_long("536870912"), 536_870_912);
        assert_eq!(parse_long("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert!((parse_float("0.35") - 0.35).abs() < 1e-12);
        assert!((parse_float("70") - 70.0).abs() < 1e-12);
        assert!((parse_float(".5x") - 0.5).abs() < 1e-12);
        assert!((parse_float("5.") - 5.0).abs() < 1e-12);
        assert!((parse_float("1e2") - 100.0).abs() < 1e-12);
        assert!((parse_float("1e") - 1.0).abs() < 1e-12);
        assert!((parse_float("-2.5E-1") + 0.25).abs() < 1e-12);
        assert!(parse_float("x1").abs() < f64::EPSILON);
        assert!(parse_float(".").abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_one_based() {
        assert_eq!(parse_one_based("1"), 0);
        assert_eq!(parse_one_based("53"), 52);
        assert_eq!(parse_one_based("0"), -1);
        assert_eq!(parse_one_based("bogus"), -1);
    }

    #[test]
    fn test_starts_with_ignore_case() {
        assert!(starts_with_ignore_case("Sample:A", "sample:"));
        assert!(starts_with_ignore_case("UMI-start:1", "umi-"));
        assert!(!starts_with_ignore_case("sam", "sample:"));
        assert!(!starts_with_ignore_case("samplе:", "sample:"));
    }
}
