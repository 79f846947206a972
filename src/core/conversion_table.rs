use crate::core::converter::Converter;
use crate::core::error::{Result, TimespanError};
use crate::core::instant::Instant;
use crate::core::unit::TimeUnit;
use indexmap::IndexMap;
use std::sync::LazyLock;

static SHARED: LazyLock<ConversionTable> = LazyLock::new(ConversionTable::new);

/// Units in discriminant order, so `unit as usize` indexes `converters`.
const BY_DISCRIMINANT: [TimeUnit; 8] = [
    TimeUnit::Millisecond,
    TimeUnit::Second,
    TimeUnit::Minute,
    TimeUnit::Hour,
    TimeUnit::Day,
    TimeUnit::Week,
    TimeUnit::Month,
    TimeUnit::Year,
];

/// Alias index plus one converter per unit. Read-only once built.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    aliases: IndexMap<&'static str, TimeUnit>,
    converters: [Converter; 8],
}

impl ConversionTable {
    pub fn new() -> Self {
        let mut aliases = IndexMap::new();
        for unit in TimeUnit::ALL {
            for alias in unit.aliases() {
                aliases.insert(*alias, unit);
            }
        }
        Self {
            aliases,
            converters: BY_DISCRIMINANT.map(Converter::for_unit),
        }
    }

    /// The process-wide table.
    pub fn shared() -> &'static ConversionTable {
        &SHARED
    }

    /// Case-sensitive alias lookup. `TimeUnit::from_str` resolves through
    /// the shared table.
    pub fn resolve(&self, alias: &str) -> Option<TimeUnit> {
        self.aliases.get(alias).copied()
    }

    pub fn get(&self, unit: TimeUnit) -> &Converter {
        &self.converters[unit as usize]
    }

    pub fn lookup(&self, alias: &str) -> Result<&Converter> {
        self.resolve(alias)
            .map(|unit| self.get(unit))
            .ok_or_else(|| TimespanError::unit(alias))
    }

    pub fn between(&self, unit: TimeUnit, start: &Instant, end: &Instant) -> Result<i64> {
        self.get(unit).between(start, end)
    }

    pub fn add(&self, unit: TimeUnit, amount: i64, start: &Instant) -> Result<Instant> {
        self.get(unit).add(amount, start)
    }

    pub fn millis_per_unit(&self, unit: TimeUnit) -> Option<i64> {
        self.get(unit).millis_per_unit
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, TimeUnit)> + '_ {
        self.aliases.iter().map(|(alias, unit)| (*alias, *unit))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::new()
    }
}
