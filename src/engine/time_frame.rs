use crate::core::calendar::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MILLIS_PER_WEEK,
    MONTHS_PER_YEAR,
};
use crate::core::conversion_table::ConversionTable;
use crate::core::error::{Result, TimespanError};
use crate::core::instant::Instant;
use crate::core::unit::TimeUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A duration decomposed into one count per canonical unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl TimeFrame {
    pub fn get(&self, unit: TimeUnit) -> i64 {
        match unit {
            TimeUnit::Year => self.years,
            TimeUnit::Month => self.months,
            TimeUnit::Week => self.weeks,
            TimeUnit::Day => self.days,
            TimeUnit::Hour => self.hours,
            TimeUnit::Minute => self.minutes,
            TimeUnit::Second => self.seconds,
            TimeUnit::Millisecond => self.milliseconds,
        }
    }

    pub fn set(&mut self, unit: TimeUnit, value: i64) {
        let field = match unit {
            TimeUnit::Year => &mut self.years,
            TimeUnit::Month => &mut self.months,
            TimeUnit::Week => &mut self.weeks,
            TimeUnit::Day => &mut self.days,
            TimeUnit::Hour => &mut self.hours,
            TimeUnit::Minute => &mut self.minutes,
            TimeUnit::Second => &mut self.seconds,
            TimeUnit::Millisecond => &mut self.milliseconds,
        };
        *field = value;
    }

    pub fn with(mut self, unit: TimeUnit, value: i64) -> Self {
        self.set(unit, value);
        self
    }

    /// Non-zero fields, largest unit first.
    pub fn iter(&self) -> impl Iterator<Item = (TimeUnit, i64)> + '_ {
        TimeUnit::ALL
            .into_iter()
            .map(|unit| (unit, self.get(unit)))
            .filter(|(_, value)| *value != 0)
    }

    pub fn is_zero(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (unit, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}{}", unit.abbreviation())?;
        }
        Ok(())
    }
}

/// Renders non-zero fields as `<value><abbreviation>` joined by single spaces.
pub fn format_time_frame(time_frame: &TimeFrame) -> String {
    time_frame.to_string()
}

/// Breaks `[start, end]` into years and months from the calendar, then splits
/// the remaining milliseconds into weeks, days, hours, minutes, seconds and
/// milliseconds.
///
/// The year count is the plain year-field difference, so it is lowered until
/// it fits inside the month count, and months are lowered until advancing
/// `start` by both no longer passes `end`. Every field is then non-negative,
/// and re-adding the fields to `start` in descending order with the same
/// converters lands exactly on `end`.
pub fn compute_time_frame(
    table: &ConversionTable,
    start: &Instant,
    end: &Instant,
) -> Result<TimeFrame> {
    let mut years = table.between(TimeUnit::Year, start, end)?;
    let total_months = table.between(TimeUnit::Month, start, end)?;
    while years > 0 && total_months < years * MONTHS_PER_YEAR {
        years -= 1;
    }
    let mut months = total_months - years * MONTHS_PER_YEAR;

    let scratch = loop {
        let scratch = table.add(TimeUnit::Year, years, start)?;
        let scratch = table.add(TimeUnit::Month, months, &scratch)?;
        if scratch <= *end {
            break scratch;
        }
        if months > 0 {
            months -= 1;
        } else if years > 0 {
            years -= 1;
            months = MONTHS_PER_YEAR - 1;
        } else {
            break scratch;
        }
    };

    let total = (*end - *start).num_milliseconds();
    let mut remaining = total - (scratch - *start).num_milliseconds();
    debug_assert!(remaining >= 0, "calendar part overshot the end instant");

    let mut take = |millis_per_unit: i64| {
        let count = remaining / millis_per_unit;
        remaining %= millis_per_unit;
        count
    };
    let weeks = take(MILLIS_PER_WEEK);
    let days = take(MILLIS_PER_DAY);
    let hours = take(MILLIS_PER_HOUR);
    let minutes = take(MILLIS_PER_MINUTE);
    let seconds = take(MILLIS_PER_SECOND);

    Ok(TimeFrame {
        years,
        months,
        weeks,
        days,
        hours,
        minutes,
        seconds,
        milliseconds: remaining,
    })
}

/// Applies each field to `start`, largest unit first. Weeks are added as
/// seven days each.
pub fn resolve_end(
    table: &ConversionTable,
    start: &Instant,
    time_frame: &TimeFrame,
) -> Result<Instant> {
    let weeks_as_days = time_frame.weeks.checked_mul(7).ok_or_else(|| {
        TimespanError::instant(format!(
            "{} weeks leave the supported range",
            time_frame.weeks
        ))
    })?;

    let mut end = *start;
    for (unit, amount) in [
        (TimeUnit::Year, time_frame.years),
        (TimeUnit::Month, time_frame.months),
        (TimeUnit::Day, weeks_as_days),
        (TimeUnit::Day, time_frame.days),
        (TimeUnit::Hour, time_frame.hours),
        (TimeUnit::Minute, time_frame.minutes),
        (TimeUnit::Second, time_frame.seconds),
        (TimeUnit::Millisecond, time_frame.milliseconds),
    ] {
        end = table.add(unit, amount, &end)?;
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::{TimeFrame, compute_time_frame, format_time_frame, resolve_end};
    use crate::core::conversion_table::ConversionTable;
    use crate::core::instant::parse;
    use crate::core::unit::TimeUnit;

    fn breakdown(start: &str, end: &str) -> TimeFrame {
        let start = parse(start).expect("start");
        let end = parse(end).expect("end");
        compute_time_frame(ConversionTable::shared(), &start, &end).expect("breakdown")
    }

    #[test]
    fn breaks_down_a_year_and_change() {
        let tf = breakdown("2022-01-01T06:24:00Z", "2023-02-21T10:52:00Z");
        assert_eq!(
            tf,
            TimeFrame {
                years: 1,
                months: 1,
                weeks: 2,
                days: 6,
                hours: 4,
                minutes: 28,
                ..TimeFrame::default()
            }
        );
        assert_eq!(tf.to_string(), "1y 1M 2w 6d 4h 28m");
    }

    #[test]
    fn ten_days_is_one_week_three_days() {
        let tf = breakdown("2024-03-01", "2024-03-11");
        assert_eq!(tf.to_string(), "1w 3d");
    }

    #[test]
    fn partial_year_does_not_go_negative() {
        let tf = breakdown("2022-12-01", "2023-01-01");
        assert_eq!(tf.years, 0);
        assert_eq!(tf.months, 1);
        assert!(TimeUnit::ALL.iter().all(|unit| tf.get(*unit) >= 0));
    }

    #[test]
    fn year_field_difference_is_trimmed_to_whole_years() {
        let tf = breakdown("2020-06-01", "2023-05-31");
        assert_eq!((tf.years, tf.months), (2, 11));
        assert_eq!(tf.to_string(), "2y 11M 4w 2d");
    }

    #[test]
    fn partial_final_month_by_time_of_day() {
        let start = parse("2023-01-15T12:00:00").expect("start");
        let end = parse("2023-02-15T11:59:59").expect("end");
        let table = ConversionTable::shared();
        let tf = compute_time_frame(table, &start, &end).expect("breakdown");
        assert_eq!(tf.months, 0);
        assert_eq!(tf.to_string(), "4w 2d 23h 59m 59s");
        assert_eq!(resolve_end(table, &start, &tf).expect("resolve"), end);
    }

    #[test]
    fn partial_final_year_by_time_of_day() {
        let start = parse("2020-06-01T12:00:00").expect("start");
        let end = parse("2021-06-01T11:00:00").expect("end");
        let table = ConversionTable::shared();
        let tf = compute_time_frame(table, &start, &end).expect("breakdown");
        assert_eq!((tf.years, tf.months), (0, 11));
        assert!(TimeUnit::ALL.iter().all(|unit| tf.get(*unit) >= 0));
        assert_eq!(resolve_end(table, &start, &tf).expect("resolve"), end);
    }

    #[test]
    fn leap_day_start_round_trips() {
        let start = parse("2020-02-29T12:00:00").expect("start");
        let end = parse("2021-03-01T00:00:00").expect("end");
        let table = ConversionTable::shared();
        let tf = compute_time_frame(table, &start, &end).expect("breakdown");
        assert_eq!(tf.years, 1);
        assert_eq!(tf.months, 0);
        assert_eq!(tf.hours, 12);
        assert_eq!(resolve_end(table, &start, &tf).expect("resolve"), end);
    }

    #[test]
    fn empty_range_formats_to_empty_string() {
        let tf = breakdown("2024-01-01", "2024-01-01");
        assert!(tf.is_zero());
        assert_eq!(format_time_frame(&tf), "");
    }

    #[test]
    fn formatting_skips_zero_fields() {
        let tf = TimeFrame::default()
            .with(TimeUnit::Year, 2)
            .with(TimeUnit::Day, 4)
            .with(TimeUnit::Millisecond, 8);
        assert_eq!(format_time_frame(&tf), "2y 4d 8ms");
        let units: Vec<_> = tf.iter().map(|(unit, _)| unit).collect();
        assert_eq!(units, vec![TimeUnit::Year, TimeUnit::Day, TimeUnit::Millisecond]);
    }

    #[test]
    fn resolve_end_adds_weeks_as_days() {
        let start = parse("2024-01-01").expect("start");
        let tf = TimeFrame::default().with(TimeUnit::Week, 2).with(TimeUnit::Day, 1);
        let end = resolve_end(ConversionTable::shared(), &start, &tf).expect("resolve");
        assert_eq!(end, parse("2024-01-16").expect("end"));
    }

    #[test]
    fn serializes_with_plural_field_names() {
        let tf = TimeFrame::default().with(TimeUnit::Month, 3);
        let json = serde_json::to_value(tf).expect("serialize");
        assert_eq!(json["months"], 3);
        assert_eq!(json["years"], 0);
    }
}
