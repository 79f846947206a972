//! Per-unit arithmetic.
//!
//! A [`Converter`] is a plain record: the unit it serves, its fixed length
//! in milliseconds when it has one, and two pure functions. Calendar units
//! (day counting, months, years) read UTC calendar fields; the rest is
//! millisecond arithmetic.
//!
//! Shared rules for every converter:
//! - `between` fails with `InvalidRange` when `start > end`. Fixed units
//!   truncate the millisecond difference; days, months and years count
//!   calendar fields and ignore the time of day.
//! - `add` fails with `InvalidUnitAmount` for negative amounts and with
//!   `InvalidInstant` when the result leaves the representable range.

use crate::core::calendar::{
    self, DAYS_PER_YEAR, Date, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
    MILLIS_PER_SECOND, MILLIS_PER_WEEK, MONTHS_PER_YEAR,
};
use crate::core::error::{Result, TimespanError};
use crate::core::instant::Instant;
use crate::core::unit::TimeUnit;
use chrono::{Datelike, TimeDelta};
use std::fmt;

pub type BetweenFn = fn(&Instant, &Instant) -> i64;
pub type AddFn = fn(i64, &Instant) -> Option<Instant>;

#[derive(Clone, Copy)]
pub struct Converter {
    pub unit: TimeUnit,
    /// `None` for months and years, whose length depends on the calendar.
    pub millis_per_unit: Option<i64>,
    between: BetweenFn,
    add: AddFn,
}

impl Converter {
    pub fn for_unit(unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Millisecond => Self::fixed::<1>(unit),
            TimeUnit::Second => Self::fixed::<{ MILLIS_PER_SECOND }>(unit),
            TimeUnit::Minute => Self::fixed::<{ MILLIS_PER_MINUTE }>(unit),
            TimeUnit::Hour => Self::fixed::<{ MILLIS_PER_HOUR }>(unit),
            TimeUnit::Day => Converter {
                unit,
                millis_per_unit: Some(MILLIS_PER_DAY),
                between: days_between,
                add: fixed_add::<{ MILLIS_PER_DAY }>,
            },
            TimeUnit::Week => Self::fixed::<{ MILLIS_PER_WEEK }>(unit),
            TimeUnit::Month => Converter {
                unit,
                millis_per_unit: None,
                between: months_between,
                add: add_months,
            },
            TimeUnit::Year => Converter {
                unit,
                millis_per_unit: None,
                between: years_between,
                add: add_years,
            },
        }
    }

    fn fixed<const MILLIS: i64>(unit: TimeUnit) -> Self {
        Converter {
            unit,
            millis_per_unit: Some(MILLIS),
            between: fixed_between::<MILLIS>,
            add: fixed_add::<MILLIS>,
        }
    }

    pub fn between(&self, start: &Instant, end: &Instant) -> Result<i64> {
        if start > end {
            return Err(TimespanError::InvalidRange {
                start: *start,
                end: *end,
            });
        }
        Ok(self.count_unchecked(start, end))
    }

    /// `between` without the ordering check, for callers that already hold
    /// `start <= end`.
    pub(crate) fn count_unchecked(&self, start: &Instant, end: &Instant) -> i64 {
        (self.between)(start, end)
    }

    pub fn add(&self, amount: i64, start: &Instant) -> Result<Instant> {
        if amount < 0 {
            return Err(TimespanError::InvalidUnitAmount {
                unit: self.unit,
                amount,
            });
        }
        (self.add)(amount, start).ok_or_else(|| {
            TimespanError::instant(format!(
                "adding {amount} {} to {start} leaves the supported range",
                self.unit
            ))
        })
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("unit", &self.unit)
            .field("millis_per_unit", &self.millis_per_unit)
            .finish()
    }
}

fn fixed_between<const MILLIS: i64>(start: &Instant, end: &Instant) -> i64 {
    (*end - *start).num_milliseconds() / MILLIS
}

fn fixed_add<const MILLIS: i64>(amount: i64, start: &Instant) -> Option<Instant> {
    amount
        .checked_mul(MILLIS)
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| start.checked_add_signed(delta))
}

/// Calendar day count from day-of-year differences, crediting one day per
/// leap year in `[start_year, end_year)`.
fn days_between(start: &Instant, end: &Instant) -> i64 {
    let (start_year, end_year) = (start.year(), end.year());
    (end_year as i64 - start_year as i64) * DAYS_PER_YEAR
        + calendar::leap_years_between(start_year, end_year)
        + calendar::day_of_year(end) as i64
        - calendar::day_of_year(start) as i64
}

/// Month-field difference, less one when the end day of month is before the
/// start day of month.
fn months_between(start: &Instant, end: &Instant) -> i64 {
    let months = (end.year() as i64 - start.year() as i64) * MONTHS_PER_YEAR
        + (end.month() as i64 - start.month() as i64);
    if end.day() < start.day() {
        months - 1
    } else {
        months
    }
}

/// Shifts the date part only, so the UTC time of day is carried over as-is.
fn add_months(amount: i64, start: &Instant) -> Option<Instant> {
    Date::of(start)
        .add_months(amount)
        .and_then(|date| date.at(start.time()))
}

/// Year-field difference. Month and day are not consulted.
fn years_between(start: &Instant, end: &Instant) -> i64 {
    end.year() as i64 - start.year() as i64
}

fn add_years(amount: i64, start: &Instant) -> Option<Instant> {
    Date::of(start)
        .add_years(amount)
        .and_then(|date| date.at(start.time()))
}
