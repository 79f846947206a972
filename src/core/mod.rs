pub mod calendar;
pub mod conversion_table;
pub mod converter;
pub mod error;
pub mod instant;
pub mod unit;
