//! Digit-sum reductions.

use crate::LayeredNumber;
use std::fmt;

/// Sum of the decimal digits of `n`.
pub fn digit_sum_once(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Apply [`digit_sum_once`] until the value is a single digit.
///
/// Returns 0 only for an input of 0.
pub fn reduce_to_single_digit(mut n: u64) -> u8 {
    while n > 9 {
        n = digit_sum_once(n);
    }
    n as u8
}

/// Display string of the layered reduction of `total`, e.g. `"19/10/1"`.
pub fn format_layered(total: u64) -> String {
    LayeredNumber::from_total(total).to_string()
}

/// Digit sum of `year ‖ month(02) ‖ day(02)` written out as one decimal string.
///
/// Zero padding contributes nothing to a digit sum, so the fields are summed
/// independently.
pub fn date_digit_sum(year: i32, month: u32, day: u32) -> u64 {
    digit_sum_once(u64::from(year.unsigned_abs()))
        + digit_sum_once(u64::from(month))
        + digit_sum_once(u64::from(day))
}

impl LayeredNumber {
    pub fn from_total(total: u64) -> Self {
        let mid = digit_sum_once(total);
        Self {
            total,
            mid,
            final_digit: reduce_to_single_digit(mid),
        }
    }

    /// Whether the intermediate step is itself multi-digit (a master number)
    pub fn has_master_step(&self) -> bool {
        self.mid > 9
    }
}

impl fmt::Display for LayeredNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_master_step() {
            write!(f, "{}/{}/{}", self.total, self.mid, self.final_digit)
        } else {
            write!(f, "{}/{}", self.total, self.mid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_sum_once() {
        assert_eq!(digit_sum_once(0), 0);
        assert_eq!(digit_sum_once(7), 7);
        assert_eq!(digit_sum_once(19), 10);
        assert_eq!(digit_sum_once(999_999), 54);
        assert_eq!(digit_sum_once(19_900_115), 26);
    }

    #[test]
    fn test_digit_sum_strictly_decreases() {
        let mut n = 999_999_999_999u64;
        let mut chain = vec![n];
        while n > 9 {
            let next = digit_sum_once(n);
            assert!(next < n, "{} did not decrease ({})", n, next);
            n = next;
            chain.push(n);
        }
        assert_eq!(chain, vec![999_999_999_999, 108, 9]);
        assert_eq!(reduce_to_single_digit(999_999), 9);
    }

    #[test]
    fn test_reduce_fixed_point() {
        for n in 0..=9 {
            assert_eq!(reduce_to_single_digit(n), n as u8);
        }
    }

    #[test]
    fn test_reduce_range() {
        for n in (0..100_000).step_by(37) {
            assert!(reduce_to_single_digit(n) <= 9);
        }
        assert_eq!(reduce_to_single_digit(u64::MAX), 6);
    }

    #[test]
    fn test_format_layered() {
        assert_eq!(format_layered(19), "19/10/1");
        assert_eq!(format_layered(12), "12/3");
        assert_eq!(format_layered(26), "26/8");
        assert_eq!(format_layered(29), "29/11/2");
        assert_eq!(format_layered(10), "10/1");
        assert_eq!(format_layered(4), "4/4");
        assert_eq!(format_layered(9), "9/9");
        assert_eq!(format_layered(0), "0/0");
    }

    #[test]
    fn test_layered_components() {
        let layered = LayeredNumber::from_total(38);
        assert_eq!(layered.mid, 11);
        assert_eq!(layered.final_digit, 2);
        assert!(layered.has_master_step());

        let single = LayeredNumber::from_total(4);
        assert_eq!(single.mid, 4);
        assert_eq!(single.final_digit, 4);
        assert!(!single.has_master_step());
    }

    #[test]
    fn test_date_digit_sum_matches_concatenation() {
        let cases = [(1990, 1, 15), (2025, 12, 31), (1989, 7, 5), (2000, 2, 29)];
        for (year, month, day) in cases {
            let concatenated = format!("{}{:02}{:02}", year, month, day);
            let expected: u64 = concatenated
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(u64::from)
                .sum();
            assert_eq!(date_digit_sum(year, month, day), expected);
        }
    }
}
