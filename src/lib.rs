//! Calendar-aware timespans.
//!
//! A [`Timespan`] pairs two UTC instants with a breakdown into years,
//! months, weeks, days, hours, minutes, seconds and milliseconds. Spans can
//! be built from two instants, from a duration string such as
//! `"1y 2M 3w 4d"`, or from an amount of one unit.
//!
//! ```
//! use timespan::{Timespan, instant};
//!
//! let start = instant::parse("2024-01-01T00:00:00Z")?;
//! let span = Timespan::from_string("2years 1month 3weeks 4days", Some(start))?;
//! assert_eq!(span.to_string(), "2y 1M 3w 4d");
//! assert_eq!(span.to_months(), 25);
//! # Ok::<(), timespan::TimespanError>(())
//! ```

pub mod core;
pub mod engine;

pub use crate::core::conversion_table::ConversionTable;
pub use crate::core::converter::Converter;
pub use crate::core::error::{Result, TimespanError};
pub use crate::core::instant::{self, Instant};
pub use crate::core::unit::TimeUnit;
pub use crate::engine::parser::{MAX_INPUT_LENGTH, parse_time_frame};
pub use crate::engine::time_frame::{TimeFrame, compute_time_frame, format_time_frame, resolve_end};
pub use crate::engine::timespan::{EqualityMode, Timespan};

/// Count of `unit` between two instants as its converter reports it; `unit`
/// is any accepted alias.
pub fn between(start: &Instant, end: &Instant, unit: &str) -> Result<i64> {
    ConversionTable::shared().lookup(unit)?.between(start, end)
}

/// `start` moved forward by `amount` of `unit`; `unit` is any accepted alias.
pub fn add(amount: i64, unit: &str, start: &Instant) -> Result<Instant> {
    ConversionTable::shared().lookup(unit)?.add(amount, start)
}
