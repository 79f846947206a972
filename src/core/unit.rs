//! The closed vocabulary of canonical time units and their accepted spellings.
//!
//! Alias resolution is case-sensitive so that `M` (months) and `m` (minutes)
//! stay distinct. Every alias belongs to exactly one unit.

use crate::core::conversion_table::ConversionTable;
use crate::core::error::{Result, TimespanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "milliseconds")]
    Millisecond,
    #[serde(rename = "seconds")]
    Second,
    #[serde(rename = "minutes")]
    Minute,
    #[serde(rename = "hours")]
    Hour,
    #[serde(rename = "days")]
    Day,
    #[serde(rename = "weeks")]
    Week,
    #[serde(rename = "months")]
    Month,
    #[serde(rename = "years")]
    Year,
}

struct Spelling {
    singular: &'static str,
    plural: &'static str,
    abbreviation: &'static str,
    aliases: &'static [&'static str],
}

const MILLISECOND: Spelling = Spelling {
    singular: "millisecond",
    plural: "milliseconds",
    abbreviation: "ms",
    aliases: &["milliseconds", "millisecond", "msec", "mss", "ms"],
};

const SECOND: Spelling = Spelling {
    singular: "second",
    plural: "seconds",
    abbreviation: "s",
    aliases: &["seconds", "second", "secs", "sec", "s"],
};

const MINUTE: Spelling = Spelling {
    singular: "minute",
    plural: "minutes",
    abbreviation: "m",
    aliases: &["minutes", "minute", "mins", "min", "m"],
};

const HOUR: Spelling = Spelling {
    singular: "hour",
    plural: "hours",
    abbreviation: "h",
    aliases: &["hours", "hour", "hrs", "hr", "h"],
};

const DAY: Spelling = Spelling {
    singular: "day",
    plural: "days",
    abbreviation: "d",
    aliases: &["days", "day", "dys", "dy", "d"],
};

const WEEK: Spelling = Spelling {
    singular: "week",
    plural: "weeks",
    abbreviation: "w",
    aliases: &["weeks", "week", "wks", "wk", "w"],
};

const MONTH: Spelling = Spelling {
    singular: "month",
    plural: "months",
    abbreviation: "M",
    aliases: &["months", "month", "mos", "mo", "M"],
};

const YEAR: Spelling = Spelling {
    singular: "year",
    plural: "years",
    abbreviation: "y",
    aliases: &["years", "year", "yrs", "yr", "y"],
};

impl TimeUnit {
    /// Canonical units, largest first. This is the breakdown and rendering order.
    pub const ALL: [TimeUnit; 8] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
    ];

    fn spelling(self) -> &'static Spelling {
        match self {
            Self::Millisecond => &MILLISECOND,
            Self::Second => &SECOND,
            Self::Minute => &MINUTE,
            Self::Hour => &HOUR,
            Self::Day => &DAY,
            Self::Week => &WEEK,
            Self::Month => &MONTH,
            Self::Year => &YEAR,
        }
    }

    pub fn singular(self) -> &'static str {
        self.spelling().singular
    }

    pub fn plural(self) -> &'static str {
        self.spelling().plural
    }

    pub fn abbreviation(self) -> &'static str {
        self.spelling().abbreviation
    }

    pub fn aliases(self) -> &'static [&'static str] {
        self.spelling().aliases
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for TimeUnit {
    type Err = TimespanError;

    /// Resolves any accepted spelling through the shared alias index.
    fn from_str(s: &str) -> Result<Self> {
        ConversionTable::shared()
            .resolve(s)
            .ok_or_else(|| TimespanError::unit(s))
    }
}
