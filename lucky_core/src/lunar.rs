//! Lunar-calendar columns.
//!
//! The lunisolar conversion itself is supplied by the caller through
//! [`LunarConverter`]. The flowing numbers are then computed on the lunar
//! fields with the same rules as the Gregorian ones. The leap-month flag does
//! not take part in the birthday comparison.

use crate::flowing::{flowing_day_of, flowing_month_of, flowing_year_of};
use crate::{LunarColumns, LunarDate, Result};
use chrono::NaiveDate;

/// Gregorian to lunar conversion.
///
/// This crate ships no implementation and `luckycal` never attaches one, so
/// tables only carry lunar columns when an embedding application passes its
/// own converter through [`ReadingContext::with_lunar`]. Without one,
/// [`DayReading::lunar`] is `None` and the lunar export columns stay empty.
/// Return [`Error::Lunar`] for dates outside the supported range.
///
/// [`ReadingContext::with_lunar`]: crate::ReadingContext::with_lunar
/// [`DayReading::lunar`]: crate::DayReading::lunar
/// [`Error::Lunar`]: crate::Error::Lunar
pub trait LunarConverter {
    fn to_lunar(&self, date: NaiveDate) -> Result<LunarDate>;
}

/// Convert the birth date once per table.
///
/// Returns None (and logs) when conversion fails; every row then reports
/// [`LunarColumns::Unavailable`].
pub fn lunar_birth(converter: &dyn LunarConverter, birth: NaiveDate) -> Option<LunarDate> {
    match converter.to_lunar(birth) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Lunar conversion of birth date {} failed: {}", birth, e);
            None
        }
    }
}

/// Lunar columns for one query date. A failed conversion only degrades this row.
pub fn lunar_columns(
    converter: &dyn LunarConverter,
    birth: Option<&LunarDate>,
    query: NaiveDate,
) -> LunarColumns {
    let Some(birth) = birth else {
        return LunarColumns::Unavailable {
            reason: "birth date has no lunar equivalent".into(),
        };
    };

    let date = match converter.to_lunar(query) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!("Lunar conversion of {} failed: {}", query, e);
            return LunarColumns::Unavailable {
                reason: e.to_string(),
            };
        }
    };

    LunarColumns::Computed {
        date,
        flowing_year: flowing_year_of(birth, &date, (birth.month, birth.day)),
        flowing_month: flowing_month_of(birth, &date),
        flowing_day: flowing_day_of(birth, &date),
    }
}
