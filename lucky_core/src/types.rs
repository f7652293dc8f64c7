//! Core domain types for the lucky calendar.
//!
//! This module defines the fundamental types used throughout the system:
//! - Calendar field access shared by Gregorian and lunar dates
//! - Layered numbers and flowing periods
//! - Reference table entries (guidance, lucky attributes)
//! - Per-day readings and month tables

use crate::lunar::LunarConverter;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Calendar Fields
// ============================================================================

/// Read access to the (year, month, day) triple of a calendar date.
///
/// The flowing-number algorithm only ever looks at these three fields, so it
/// runs unchanged over Gregorian and lunar dates.
pub trait CalendarFields {
    fn ymd(&self) -> (i32, u32, u32);
}

impl CalendarFields for NaiveDate {
    fn ymd(&self) -> (i32, u32, u32) {
        (self.year(), self.month(), self.day())
    }
}

/// A date in the lunisolar calendar, as supplied by a [`LunarConverter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
}

impl CalendarFields for LunarDate {
    fn ymd(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let leap = if self.is_leap_month { "閏" } else { "" };
        write!(f, "{}-{}{:02}-{:02}", self.year, leap, self.month, self.day)
    }
}

// ============================================================================
// Layered Numbers
// ============================================================================

/// A chain of digit-sum reductions: `total` → `mid` → `final_digit`.
///
/// `mid` is the one-pass digit sum of `total`, also for single-digit totals.
/// `final_digit` is always 0-9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayeredNumber {
    pub total: u64,
    pub mid: u64,
    pub final_digit: u8,
}

/// Which calendar component varies against the fixed birth fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowingPeriodKind {
    Year,
    Month,
    Day,
}

impl FlowingPeriodKind {
    pub const ALL: [FlowingPeriodKind; 3] = [Self::Year, Self::Month, Self::Day];

    pub fn label(&self) -> &'static str {
        match self {
            FlowingPeriodKind::Year => "流年",
            FlowingPeriodKind::Month => "流月",
            FlowingPeriodKind::Day => "流日",
        }
    }
}

/// How a February 29 birthday is placed in a non-leap query year when
/// deciding whether the birthday has already occurred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapBirthdayPolicy {
    /// Plain (month, day) comparison against (2, 29): the birthday is
    /// reached on March 1.
    #[default]
    MarchFirst,
    /// The birthday is reached on February 28.
    FebruaryTwentyEighth,
}

// ============================================================================
// Reference Table Entries
// ============================================================================

/// Guidance attached to a layered display string or a single digit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    pub stars: String,
}

/// Lucky color, crystal and small object for a digit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyAttributes {
    pub color: String,
    pub crystal: String,
    pub small_object: String,
}

// ============================================================================
// Readings
// ============================================================================

/// Lunar-calendar columns of a reading
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LunarColumns {
    Computed {
        date: LunarDate,
        flowing_year: LayeredNumber,
        flowing_month: LayeredNumber,
        flowing_day: LayeredNumber,
    },
    /// Conversion failed; only this row's lunar columns are affected.
    Unavailable { reason: String },
}

/// Everything computed for one query date
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DayReading {
    pub date: NaiveDate,
    pub weekday: String,
    pub flowing_year: LayeredNumber,
    pub flowing_month: LayeredNumber,
    pub flowing_day: LayeredNumber,
    pub main_number: u8,
    pub day_name: String,
    pub guidance: String,
    pub stars: String,
    pub lucky: LuckyAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunar: Option<LunarColumns>,
}

/// One row per calendar day of a month, in ascending date order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthTable {
    pub birth: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub rows: Vec<DayReading>,
}

/// Runtime context for readings
#[derive(Clone, Copy)]
pub struct ReadingContext<'a> {
    pub birth: NaiveDate,
    pub leap_policy: LeapBirthdayPolicy,
    pub lunar: Option<&'a dyn LunarConverter>,
}

impl<'a> ReadingContext<'a> {
    pub fn new(birth: NaiveDate) -> Self {
        Self {
            birth,
            leap_policy: LeapBirthdayPolicy::default(),
            lunar: None,
        }
    }

    pub fn with_leap_policy(mut self, policy: LeapBirthdayPolicy) -> Self {
        self.leap_policy = policy;
        self
    }

    pub fn with_lunar(mut self, converter: &'a dyn LunarConverter) -> Self {
        self.lunar = Some(converter);
        self
    }
}
