//! Day readings and month tables.
//!
//! A month table has exactly one row per calendar day, in ascending order.

use crate::flowing::{flowing_day, flowing_month, flowing_year};
use crate::lunar::{lunar_birth, lunar_columns};
use crate::reduction::reduce_to_single_digit;
use crate::tables::ReferenceTables;
use crate::{DayReading, Error, LunarDate, MonthTable, ReadingContext, Result};
use chrono::{Datelike, NaiveDate};

/// Parse a `YYYY-MM-DD` date, rejecting days that do not exist
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", s, e)))
}

/// Number of days in a Gregorian month
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(Error::InvalidMonth { year, month })?;

    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Reading for a single query date
pub fn read_day(tables: &ReferenceTables, ctx: &ReadingContext<'_>, query: NaiveDate) -> DayReading {
    let birth_lunar = ctx
        .lunar
        .and_then(|converter| lunar_birth(converter, ctx.birth));
    read_day_with(tables, ctx, birth_lunar.as_ref(), query)
}

/// Generate one reading per day of `year`-`month`
pub fn generate_month_table(
    tables: &ReferenceTables,
    ctx: &ReadingContext<'_>,
    year: i32,
    month: u32,
) -> Result<MonthTable> {
    let first = first_of_month(year, month)?;

    tracing::info!(
        "Generating table for {}-{:02} (birth {})",
        year,
        month,
        ctx.birth
    );

    let birth_lunar = ctx
        .lunar
        .and_then(|converter| lunar_birth(converter, ctx.birth));

    let rows: Vec<DayReading> = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| read_day_with(tables, ctx, birth_lunar.as_ref(), date))
        .collect();

    tracing::debug!("Generated {} rows", rows.len());

    Ok(MonthTable {
        birth: ctx.birth,
        year,
        month,
        rows,
    })
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidMonth { year, month })
}

fn read_day_with(
    tables: &ReferenceTables,
    ctx: &ReadingContext<'_>,
    birth_lunar: Option<&LunarDate>,
    query: NaiveDate,
) -> DayReading {
    let day = flowing_day(ctx.birth, query);
    let main_number = reduce_to_single_digit(day.total);
    let guidance = tables.resolve_day_guidance(&day);

    DayReading {
        date: query,
        weekday: query.format("%A").to_string(),
        flowing_year: flowing_year(ctx.birth, query, ctx.leap_policy),
        flowing_month: flowing_month(ctx.birth, query),
        flowing_day: day,
        main_number,
        day_name: guidance.name.unwrap_or_default(),
        guidance: guidance.text,
        stars: guidance.stars,
        lucky: tables.resolve_lucky(main_number),
        lunar: ctx
            .lunar
            .map(|converter| lunar_columns(converter, birth_lunar, query)),
    }
}
