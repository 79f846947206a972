use crate::core::instant::Instant;
use chrono::{Datelike, NaiveDate, NaiveTime};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;
pub const MONTHS_PER_YEAR: i64 = 12;
pub const DAYS_PER_YEAR: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Leap years in `[start_year, end_year)`.
pub fn leap_years_between(start_year: i32, end_year: i32) -> i64 {
    (start_year..end_year)
        .filter(|year| is_leap_year(*year))
        .count() as i64
}

/// 1-based day of the year, UTC.
pub fn day_of_year(instant: &Instant) -> u32 {
    instant.ordinal()
}

impl Date {
    pub fn of(instant: &Instant) -> Self {
        Date {
            year: instant.year(),
            month: instant.month() as u8,
            day: instant.day() as u8,
        }
    }

    /// Moves the month field, rolling the year and clamping the day to the
    /// target month's length.
    pub fn add_months(self, delta: i64) -> Option<Self> {
        let total = (self.month as i64 - 1).checked_add(delta)?;
        let year = i32::try_from(self.year as i64 + total.div_euclid(MONTHS_PER_YEAR)).ok()?;
        let month = (total.rem_euclid(MONTHS_PER_YEAR) + 1) as u8;
        let day = self.day.min(days_in_month(year, month));
        Some(Date { year, month, day })
    }

    /// Moves the year field. Feb 29 becomes Feb 28 when the target year is
    /// not a leap year.
    pub fn add_years(self, delta: i64) -> Option<Self> {
        let year = i32::try_from((self.year as i64).checked_add(delta)?).ok()?;
        let day = if self.month == 2 && self.day == 29 && !is_leap_year(year) {
            28
        } else {
            self.day
        };
        Some(Date {
            year,
            month: self.month,
            day,
        })
    }

    /// Rebuilds an instant on this date with the given time of day.
    pub fn at(self, time: NaiveTime) -> Option<Instant> {
        NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
            .map(|date| date.and_time(time).and_utc())
    }
}
