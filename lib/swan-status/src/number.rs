/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

/// Parse a byte or packet count such as `1,234,567`.
///
/// Commas are dropped, then leading ASCII digits are consumed until the
/// first other character. No digits at all gives 0, and values that do not
/// fit are saturated to `i64::MAX`.
pub fn parse_count(s: &str) -> i64 {
    let mut n: i64 = 0;
    for c in s.bytes().filter(|c| *c != b',') {
        if !c.is_ascii_digit() {
            break;
        }
        n = n.saturating_mul(10).saturating_add(i64::from(c - b'0'));
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped() {
        assert_eq!(parse_count("1,234,567"), 1234567);
        assert_eq!(parse_count("1,2,3"), 123);
        assert_eq!(parse_count(",,5"), 5);
    }

    #[test]
    fn plain() {
        assert_eq!(parse_count("0"), 0);
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("007"), 7);
    }

    #[test]
    fn no_digits() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count(","), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(" 12"), 0);
    }

    #[test]
    fn trailing_garbage() {
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count("1,000 bytes"), 1000);
        assert_eq!(parse_count("9x9"), 9);
    }

    #[test]
    fn saturate() {
        assert_eq!(parse_count("9223372036854775807"), i64::MAX);
        assert_eq!(parse_count("9223372036854775808"), i64::MAX);
        assert_eq!(parse_count("99,999,999,999,999,999,999,999"), i64::MAX);
    }
}
