//! Duration-string scanning.
//!
//! Input is a run of `<amount><unit>` pairs such as `1y 2M 3w` or `1y2M3w`.
//! Before any scanning the input must be at most [`MAX_INPUT_LENGTH`]
//! characters and contain only ASCII letters, digits and whitespace. The
//! scanner then walks the string once, so the work is linear in an input
//! that is already capped.
//!
//! Scanning rules:
//! - an amount is up to [`MAX_AMOUNT_DIGITS`] decimal digits directly
//!   followed by a unit; a missing amount counts as zero;
//! - digits followed by whitespace or the end of input pair with nothing and
//!   are skipped;
//! - a unit is the longest run of letters and must be a known alias;
//! - when a unit appears twice, the last amount wins.

use crate::core::conversion_table::ConversionTable;
use crate::core::error::{Result, TimespanError};
use crate::engine::time_frame::TimeFrame;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

pub const MAX_INPUT_LENGTH: usize = 75;
pub const MAX_AMOUNT_DIGITS: usize = 10;

static ALLOWED_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9[:space:]]+$").expect("Invalid regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub amount: i64,
    pub unit: &'a str,
}

/// Lazily yields `<amount><unit>` pairs from already-validated input.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { rest: input }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.rest = self.rest.trim_start();
            if self.rest.is_empty() {
                return None;
            }

            let digits_len = self
                .rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(self.rest.len());
            let (digits, after) = self.rest.split_at(digits_len);
            let unit_len = after
                .find(|c: char| c.is_whitespace() || c.is_ascii_digit())
                .unwrap_or(after.len());
            let (unit, rest) = after.split_at(unit_len);
            self.rest = rest;

            if unit.is_empty() {
                continue;
            }
            if digits.len() > MAX_AMOUNT_DIGITS {
                self.rest = "";
                return Some(Err(TimespanError::input(format!(
                    "amount {digits} has more than {MAX_AMOUNT_DIGITS} digits"
                ))));
            }
            let amount = if digits.is_empty() {
                0
            } else {
                match digits.parse::<i64>() {
                    Ok(amount) => amount,
                    Err(err) => {
                        self.rest = "";
                        return Some(Err(TimespanError::input(format!(
                            "amount {digits}: {err}"
                        ))));
                    }
                }
            };
            return Some(Ok(Token { amount, unit }));
        }
    }
}

pub fn validate_input(input: &str) -> Result<()> {
    let length = input.chars().count();
    if length > MAX_INPUT_LENGTH {
        return Err(TimespanError::input(format!(
            "{length} characters exceeds the limit of {MAX_INPUT_LENGTH}"
        )));
    }
    if !ALLOWED_CHARACTERS.is_match(input) {
        return Err(TimespanError::input(
            "only ASCII letters, digits and whitespace are allowed",
        ));
    }
    Ok(())
}

/// Parses a duration string into a [`TimeFrame`] without anchoring it to an
/// instant.
pub fn parse_time_frame(table: &ConversionTable, input: &str) -> Result<TimeFrame> {
    validate_input(input)?;

    let mut time_frame = TimeFrame::default();
    let mut matched = 0usize;
    for token in Tokens::new(input) {
        let Token { amount, unit } = token?;
        let resolved = table
            .resolve(unit)
            .ok_or_else(|| TimespanError::unit(unit))?;
        trace!(amount, unit, resolved = %resolved, "duration token");
        time_frame.set(resolved, amount);
        matched += 1;
    }

    if matched == 0 {
        return Err(TimespanError::input("no amount and unit pairs found"));
    }
    Ok(time_frame)
}

#[cfg(test)]
mod tests {
    use super::{MAX_INPUT_LENGTH, Token, Tokens, parse_time_frame, validate_input};
    use crate::core::conversion_table::ConversionTable;
    use crate::core::error::TimespanError;
    use crate::core::unit::TimeUnit;
    use crate::engine::time_frame::TimeFrame;

    fn parse(input: &str) -> Result<TimeFrame, TimespanError> {
        parse_time_frame(ConversionTable::shared(), input)
    }

    #[test]
    fn tokens_with_and_without_spaces() {
        let spaced: Vec<_> = Tokens::new("1y 2M").collect::<Result<_, _>>().expect("tokens");
        let packed: Vec<_> = Tokens::new("1y2M").collect::<Result<_, _>>().expect("tokens");
        assert_eq!(spaced, packed);
        assert_eq!(
            packed,
            vec![
                Token { amount: 1, unit: "y" },
                Token { amount: 2, unit: "M" },
            ]
        );
    }

    #[test]
    fn missing_amount_counts_as_zero_and_dangling_digits_are_skipped() {
        let tokens: Vec<_> = Tokens::new("5 d 7 3h").collect::<Result<_, _>>().expect("tokens");
        assert_eq!(
            tokens,
            vec![
                Token { amount: 0, unit: "d" },
                Token { amount: 3, unit: "h" },
            ]
        );
    }

    #[test]
    fn parses_every_field() {
        let tf = parse("1y 2M 3w 4d 5h 6m 7s 8ms").expect("parse");
        assert_eq!(
            tf,
            TimeFrame {
                years: 1,
                months: 2,
                weeks: 3,
                days: 4,
                hours: 5,
                minutes: 6,
                seconds: 7,
                milliseconds: 8,
            }
        );
    }

    #[test]
    fn parses_long_aliases() {
        let tf = parse("1yr 2mos 3wks 4dys 5hrs 6mins 7secs 8mss").expect("parse");
        assert_eq!(tf.to_string(), "1y 2M 3w 4d 5h 6m 7s 8ms");
    }

    #[test]
    fn last_duplicate_wins() {
        let tf = parse("1d 2d").expect("parse");
        assert_eq!(tf.days, 2);
    }

    #[test]
    fn unknown_unit_is_named() {
        let err = parse("5 unknownUnit").expect_err("unknown unit");
        assert_eq!(
            err,
            TimespanError::InvalidUnit {
                token: "unknownUnit".to_string()
            }
        );
    }

    #[test]
    fn rejects_disallowed_characters() {
        for input in ["1y-2M", "1.5h", "3d!", ""] {
            let err = parse(input).expect_err("invalid characters");
            assert!(matches!(err, TimespanError::InvalidInput { .. }), "{input:?}");
        }
    }

    #[test]
    fn only_ascii_whitespace_separates_pairs() {
        let tf = parse("1d\t2h\n3m\r\n").expect("ascii whitespace");
        assert_eq!(tf.to_string(), "1d 2h 3m");
        for input in ["1d\u{3000}2h", "1d\u{a0}2h", "1d\u{2003}2h"] {
            let err = parse(input).expect_err("non-ascii whitespace");
            assert!(matches!(err, TimespanError::InvalidInput { .. }), "{input:?}");
        }
    }

    #[test]
    fn rejects_input_without_pairs() {
        let err = parse("42  7").expect_err("no pairs");
        assert!(matches!(err, TimespanError::InvalidInput { .. }));
    }

    #[test]
    fn length_cap_is_inclusive() {
        let pad = " ".repeat(MAX_INPUT_LENGTH - 2);
        let at_limit = format!("1d{pad}");
        assert_eq!(at_limit.len(), MAX_INPUT_LENGTH);
        assert!(validate_input(&at_limit).is_ok());

        let over = format!("{at_limit} ");
        let err = parse(&over).expect_err("too long");
        assert!(matches!(err, TimespanError::InvalidInput { .. }));
    }

    #[test]
    fn amounts_are_capped_at_ten_digits() {
        let tf = parse("9999999999s").expect("ten digits");
        assert_eq!(tf.get(TimeUnit::Second), 9_999_999_999);

        let err = parse("12345678901s").expect_err("eleven digits");
        assert!(matches!(err, TimespanError::InvalidInput { .. }));
    }
}
