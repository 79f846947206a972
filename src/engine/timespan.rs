use crate::core::calendar::{DAYS_PER_YEAR, MILLIS_PER_DAY};
use crate::core::conversion_table::ConversionTable;
use crate::core::error::{Result, TimespanError};
use crate::core::instant::{self, Instant};
use crate::core::unit::TimeUnit;
use crate::engine::parser::parse_time_frame;
use crate::engine::time_frame::{TimeFrame, compute_time_frame, resolve_end};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Average month length used only by [`Timespan::to_approximate`].
pub const APPROXIMATE_DAYS_PER_MONTH: f64 = 30.4167;

/// How two timespans are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EqualityMode {
    /// Same start and same end.
    Range,
    /// Same total length in milliseconds.
    #[default]
    Duration,
}

/// An ordered pair of instants with its breakdown and canonical string
/// computed once at construction. Totals are answered by the table the span
/// was built with.
#[derive(Debug, Clone, Serialize)]
pub struct Timespan {
    #[serde(skip)]
    table: &'static ConversionTable,
    start: Instant,
    end: Instant,
    #[serde(rename = "timeframe")]
    time_frame: TimeFrame,
    text: String,
}

impl Timespan {
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        Self::with_table(ConversionTable::shared(), start, end)
    }

    pub fn with_table(
        table: &'static ConversionTable,
        start: Instant,
        end: Instant,
    ) -> Result<Self> {
        let (start, end) = (instant::truncate(start), instant::truncate(end));
        if start > end {
            return Err(TimespanError::InvalidRange { start, end });
        }
        let time_frame = compute_time_frame(table, &start, &end)?;
        let text = time_frame.to_string();
        debug!(%start, %end, timeframe = %text, "timespan computed");
        Ok(Self {
            table,
            start,
            end,
            time_frame,
            text,
        })
    }

    /// Parses `input` (for example `"2years 1month 3weeks"`) and anchors it at
    /// `start`, or at the current instant when `start` is `None`.
    pub fn from_string(input: &str, start: Option<Instant>) -> Result<Self> {
        let table = ConversionTable::shared();
        let start = start.unwrap_or_else(instant::now);
        let time_frame = parse_time_frame(table, input)?;
        let end = resolve_end(table, &start, &time_frame)?;
        debug!(input, %start, %end, "duration string resolved");
        Self::with_table(table, start, end)
    }

    /// `amount` of the unit spelled `unit` (any accepted alias), from `start`
    /// or now.
    pub fn from_units(amount: i64, unit: &str, start: Option<Instant>) -> Result<Self> {
        let unit = ConversionTable::shared()
            .resolve(unit)
            .ok_or_else(|| TimespanError::unit(unit))?;
        Self::from_unit(amount, unit, start)
    }

    pub fn from_unit(amount: i64, unit: TimeUnit, start: Option<Instant>) -> Result<Self> {
        let table = ConversionTable::shared();
        let start = start.unwrap_or_else(instant::now);
        let end = table.add(unit, amount, &start)?;
        Self::with_table(table, start, end)
    }

    pub fn from_milliseconds(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Millisecond, start)
    }

    pub fn from_seconds(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Second, start)
    }

    pub fn from_minutes(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Minute, start)
    }

    pub fn from_hours(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Hour, start)
    }

    pub fn from_days(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Day, start)
    }

    pub fn from_weeks(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Week, start)
    }

    pub fn from_months(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Month, start)
    }

    pub fn from_years(amount: i64, start: Option<Instant>) -> Result<Self> {
        Self::from_unit(amount, TimeUnit::Year, start)
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn table(&self) -> &'static ConversionTable {
        self.table
    }

    pub fn time_frame(&self) -> &TimeFrame {
        &self.time_frame
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Converter count of `unit` between start and end. Independent of the
    /// breakdown: `total(Month)` counts every month, not the months field,
    /// and `total(Year)` is the year-field difference.
    pub fn total(&self, unit: TimeUnit) -> i64 {
        self.table
            .get(unit)
            .count_unchecked(&self.start, &self.end)
    }

    pub fn to_unit(&self, unit: &str) -> Result<i64> {
        self.table
            .lookup(unit)
            .map(|converter| converter.count_unchecked(&self.start, &self.end))
    }

    pub fn to_milliseconds(&self) -> i64 {
        self.total(TimeUnit::Millisecond)
    }

    pub fn to_seconds(&self) -> i64 {
        self.total(TimeUnit::Second)
    }

    pub fn to_minutes(&self) -> i64 {
        self.total(TimeUnit::Minute)
    }

    pub fn to_hours(&self) -> i64 {
        self.total(TimeUnit::Hour)
    }

    pub fn to_days(&self) -> i64 {
        self.total(TimeUnit::Day)
    }

    pub fn to_weeks(&self) -> i64 {
        self.total(TimeUnit::Week)
    }

    pub fn to_months(&self) -> i64 {
        self.total(TimeUnit::Month)
    }

    pub fn to_years(&self) -> i64 {
        self.total(TimeUnit::Year)
    }

    /// Fractional total from fixed ratios. Months count as
    /// [`APPROXIMATE_DAYS_PER_MONTH`] days and years as 365 days, so this is
    /// not calendar-exact; use [`Timespan::total`] for calendar counts.
    pub fn to_approximate(&self, unit: TimeUnit) -> f64 {
        let millis = self.to_milliseconds() as f64;
        let days = millis / MILLIS_PER_DAY as f64;
        match unit {
            TimeUnit::Month => days / APPROXIMATE_DAYS_PER_MONTH,
            TimeUnit::Year => days / DAYS_PER_YEAR as f64,
            _ => {
                let per_unit = self
                    .table
                    .millis_per_unit(unit)
                    .unwrap_or(1);
                millis / per_unit as f64
            }
        }
    }

    pub fn equals(a: &Timespan, b: &Timespan, mode: EqualityMode) -> bool {
        match mode {
            EqualityMode::Range => a.start == b.start && a.end == b.end,
            EqualityMode::Duration => a.to_milliseconds() == b.to_milliseconds(),
        }
    }

    pub fn eq_with(&self, other: &Timespan, mode: EqualityMode) -> bool {
        Self::equals(self, other, mode)
    }
}

impl PartialEq for Timespan {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, EqualityMode::default())
    }
}

impl Eq for Timespan {}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Timespan {
    type Err = TimespanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}
