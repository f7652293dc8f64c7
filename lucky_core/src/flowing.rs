//! Flowing year / month / day numbers.
//!
//! Each flowing number keeps two birth fields fixed and takes one field from
//! the query date:
//!
//! | Period | year      | month      | day       |
//! |--------|-----------|------------|-----------|
//! | Day    | birth     | birth      | query     |
//! | Month  | birth     | month ref  | birth     |
//! | Year   | year ref  | birth      | birth     |
//!
//! The month and year references step back one unit until the birth day (or
//! birthday) has been reached in the current cycle.

use crate::reduction::{date_digit_sum, reduce_to_single_digit};
use crate::{CalendarFields, FlowingPeriodKind, LayeredNumber, LeapBirthdayPolicy};
use chrono::{Datelike, NaiveDate};

/// Flowing day of `query` for someone born on `birth`
pub fn flowing_day(birth: NaiveDate, query: NaiveDate) -> LayeredNumber {
    flowing_day_of(&birth, &query)
}

/// Flowing month of `query` for someone born on `birth`
pub fn flowing_month(birth: NaiveDate, query: NaiveDate) -> LayeredNumber {
    flowing_month_of(&birth, &query)
}

/// Flowing year of `query` for someone born on `birth`
pub fn flowing_year(
    birth: NaiveDate,
    query: NaiveDate,
    policy: LeapBirthdayPolicy,
) -> LayeredNumber {
    let cutoff = birthday_cutoff(birth, query.year(), policy);
    flowing_year_of(&birth, &query, cutoff)
}

/// Dispatch on the flowing period
pub fn flowing_number(
    kind: FlowingPeriodKind,
    birth: NaiveDate,
    query: NaiveDate,
    policy: LeapBirthdayPolicy,
) -> LayeredNumber {
    match kind {
        FlowingPeriodKind::Year => flowing_year(birth, query, policy),
        FlowingPeriodKind::Month => flowing_month(birth, query),
        FlowingPeriodKind::Day => flowing_day(birth, query),
    }
}

/// Fully reduced flowing day, the key for daily guidance and lucky attributes
pub fn main_day_number(birth: NaiveDate, query: NaiveDate) -> u8 {
    reduce_to_single_digit(flowing_day(birth, query).total)
}

/// Query month if the birth day has been reached this month, else the
/// previous month (January wraps to December).
pub fn month_reference(query_month: u32, query_day: u32, birth_day: u32) -> u32 {
    if query_day >= birth_day {
        query_month
    } else if query_month == 1 {
        12
    } else {
        query_month - 1
    }
}

/// Query year if the birthday has been reached this year, else the year before
pub fn year_reference(birth: NaiveDate, query: NaiveDate, policy: LeapBirthdayPolicy) -> i32 {
    let cutoff = birthday_cutoff(birth, query.year(), policy);
    year_reference_for(&query, cutoff)
}

/// (month, day) at which the birthday counts as reached in `query_year`
pub fn birthday_cutoff(birth: NaiveDate, query_year: i32, policy: LeapBirthdayPolicy) -> (u32, u32) {
    let cutoff = (birth.month(), birth.day());
    if cutoff != (2, 29) || is_leap_year(query_year) {
        return cutoff;
    }

    match policy {
        LeapBirthdayPolicy::MarchFirst => cutoff,
        LeapBirthdayPolicy::FebruaryTwentyEighth => (2, 28),
    }
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

// ============================================================================
// Field-generic forms, shared with the lunar columns
// ============================================================================

pub(crate) fn flowing_day_of<B, Q>(birth: &B, query: &Q) -> LayeredNumber
where
    B: CalendarFields + ?Sized,
    Q: CalendarFields + ?Sized,
{
    let (birth_year, birth_month, _) = birth.ymd();
    let (_, _, query_day) = query.ymd();
    LayeredNumber::from_total(date_digit_sum(birth_year, birth_month, query_day))
}

pub(crate) fn flowing_month_of<B, Q>(birth: &B, query: &Q) -> LayeredNumber
where
    B: CalendarFields + ?Sized,
    Q: CalendarFields + ?Sized,
{
    let (birth_year, _, birth_day) = birth.ymd();
    let (_, query_month, query_day) = query.ymd();
    let month_ref = month_reference(query_month, query_day, birth_day);
    LayeredNumber::from_total(date_digit_sum(birth_year, month_ref, birth_day))
}

pub(crate) fn flowing_year_of<B, Q>(birth: &B, query: &Q, cutoff: (u32, u32)) -> LayeredNumber
where
    B: CalendarFields + ?Sized,
    Q: CalendarFields + ?Sized,
{
    let (_, birth_month, birth_day) = birth.ymd();
    let year_ref = year_reference_for(query, cutoff);
    LayeredNumber::from_total(date_digit_sum(year_ref, birth_month, birth_day))
}

fn year_reference_for<Q: CalendarFields + ?Sized>(query: &Q, cutoff: (u32, u32)) -> i32 {
    let (query_year, query_month, query_day) = query.ymd();
    if (query_month, query_day) >= cutoff {
        query_year
    } else {
        query_year - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flowing_day_example() {
        let birth = date(1990, 1, 1);
        let query = date(2025, 9, 15);

        let day = flowing_day(birth, query);
        assert_eq!(day.total, 26);
        assert_eq!(day.to_string(), "26/8");
        assert_eq!(main_day_number(birth, query), 8);
    }

    #[test]
    fn test_flowing_month_and_year_example() {
        let birth = date(1990, 1, 1);
        let query = date(2025, 9, 15);

        // 1990 09 01
        assert_eq!(flowing_month(birth, query).to_string(), "29/11/2");
        // 2025 01 01
        let year = flowing_year(birth, query, LeapBirthdayPolicy::default());
        assert_eq!(year.to_string(), "11/2");
    }

    #[test]
    fn test_single_digit_totals_keep_two_segments() {
        let birth = date(2000, 1, 1);

        // 2000 01 01
        let day = flowing_day(birth, date(2025, 3, 1));
        assert_eq!(day.total, 4);
        assert_eq!(day.to_string(), "4/4");
        assert_eq!(main_day_number(birth, date(2025, 3, 1)), 4);

        // 2000 02 01
        assert_eq!(flowing_month(birth, date(2025, 2, 10)).to_string(), "5/5");

        // 2000 01 01
        let year = flowing_year(birth, date(2000, 6, 1), LeapBirthdayPolicy::default());
        assert_eq!(year.to_string(), "4/4");
    }

    #[test]
    fn test_year_reference_cutoff() {
        let birth = date(1989, 7, 5);
        let policy = LeapBirthdayPolicy::default();

        assert_eq!(year_reference(birth, date(2025, 1, 1), policy), 2024);
        assert_eq!(year_reference(birth, date(2025, 7, 4), policy), 2024);
        assert_eq!(year_reference(birth, date(2025, 7, 5), policy), 2025);
        assert_eq!(year_reference(birth, date(2025, 12, 31), policy), 2025);

        // 2024 07 05 vs 2025 07 05
        assert_eq!(flowing_year(birth, date(2025, 1, 1), policy).to_string(), "20/2");
        assert_eq!(flowing_year(birth, date(2025, 12, 31), policy).to_string(), "21/3");
    }

    #[test]
    fn test_month_reference() {
        assert_eq!(month_reference(9, 15, 10), 9);
        assert_eq!(month_reference(9, 10, 10), 9);
        assert_eq!(month_reference(9, 9, 10), 8);
        assert_eq!(month_reference(1, 3, 20), 12);
    }

    #[test]
    fn test_flowing_month_uses_previous_month_before_birth_day() {
        let birth = date(1985, 3, 20);

        // 1985 12 20
        let before = flowing_month(birth, date(2025, 1, 19));
        assert_eq!(before.total, 1 + 9 + 8 + 5 + 1 + 2 + 2);
        // 1985 01 20
        let after = flowing_month(birth, date(2025, 1, 20));
        assert_eq!(after.total, 1 + 9 + 8 + 5 + 1 + 2);
    }

    #[test]
    fn test_birth_day_31_never_reached_in_short_month() {
        let birth = date(1990, 5, 31);
        // 1990 03 31
        let march = LayeredNumber::from_total(1 + 9 + 9 + 3 + 3 + 1);
        for day in 1..=30 {
            assert_eq!(flowing_month(birth, date(2025, 4, day)), march);
        }
    }

    #[test]
    fn test_leap_birthday_march_first_policy() {
        let birth = date(2000, 2, 29);
        let policy = LeapBirthdayPolicy::MarchFirst;

        assert_eq!(year_reference(birth, date(2025, 2, 28), policy), 2024);
        assert_eq!(year_reference(birth, date(2025, 3, 1), policy), 2025);
        // Leap query year: reached on the day itself
        assert_eq!(year_reference(birth, date(2024, 2, 28), policy), 2023);
        assert_eq!(year_reference(birth, date(2024, 2, 29), policy), 2024);
    }

    #[test]
    fn test_leap_birthday_february_28_policy() {
        let birth = date(2000, 2, 29);
        let policy = LeapBirthdayPolicy::FebruaryTwentyEighth;

        assert_eq!(year_reference(birth, date(2025, 2, 27), policy), 2024);
        assert_eq!(year_reference(birth, date(2025, 2, 28), policy), 2025);
        assert_eq!(year_reference(birth, date(2024, 2, 28), policy), 2023);
        assert_eq!(birthday_cutoff(birth, 2024, policy), (2, 29));
        assert_eq!(birthday_cutoff(birth, 2025, policy), (2, 28));
    }

    #[test]
    fn test_leap_policy_ignored_for_other_birthdays() {
        let birth = date(1999, 2, 28);
        assert_eq!(
            birthday_cutoff(birth, 2025, LeapBirthdayPolicy::FebruaryTwentyEighth),
            (2, 28)
        );
    }

    #[test]
    fn test_flowing_number_dispatch() {
        let birth = date(1990, 1, 1);
        let query = date(2025, 9, 15);
        let policy = LeapBirthdayPolicy::default();

        for kind in FlowingPeriodKind::ALL {
            let expected = match kind {
                FlowingPeriodKind::Year => flowing_year(birth, query, policy),
                FlowingPeriodKind::Month => flowing_month(birth, query),
                FlowingPeriodKind::Day => flowing_day(birth, query),
            };
            assert_eq!(flowing_number(kind, birth, query, policy), expected);
        }
    }

    #[test]
    fn test_main_number_never_zero_for_real_dates() {
        let birth = date(1990, 1, 1);
        let mut query = date(2025, 1, 1);
        while query.year() == 2025 {
            assert!((1..=9).contains(&main_day_number(birth, query)));
            query = query.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_is_leap_year() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2025));
    }
}
