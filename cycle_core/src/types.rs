//! Core domain types for the cycle forecast engine.
//!
//! This module defines the fundamental types used throughout the engine:
//! - Daily observations (flow level, scored metrics, journal text)
//! - Calendar helpers (months, inclusive date ranges)
//! - Forecast outputs (period statistics, monthly predictions)

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Observation Types
// ============================================================================

/// Bleeding intensity for one day
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlowLevel {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
}

impl FlowLevel {
    /// Map an integer category onto a flow level, clamping into 0..=3
    pub fn from_code(code: i64) -> Self {
        match code {
            i64::MIN..=0 => FlowLevel::None,
            1 => FlowLevel::Light,
            2 => FlowLevel::Medium,
            _ => FlowLevel::Heavy,
        }
    }

    /// Integer category of this level (0 none .. 3 heavy)
    pub fn code(self) -> u8 {
        match self {
            FlowLevel::None => 0,
            FlowLevel::Light => 1,
            FlowLevel::Medium => 2,
            FlowLevel::Heavy => 3,
        }
    }

    /// Any flow above none
    pub fn is_bleeding(self) -> bool {
        self != FlowLevel::None
    }
}

/// A logged 0..=4 rating for pain, energy or mood
///
/// Whether a metric was logged at all is expressed with `Option<Score>`;
/// `Score(0)` is a real, logged lowest rating. Deserialized values are
/// clamped like [`Score::new`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Top of the rating scale
    pub const MAX: u8 = 4;

    /// Build a score, clamping anything above the scale to `Score::MAX`
    pub fn new(value: u8) -> Self {
        Score(value.min(Self::MAX))
    }

    /// The rating as logged, 0..=4
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Score {
    fn from(value: u8) -> Self {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// One day of observations, keyed by its calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub flow: FlowLevel,
    #[serde(default)]
    pub pain: Option<Score>,
    #[serde(default)]
    pub energy: Option<Score>,
    #[serde(default)]
    pub mood: Option<Score>,
    #[serde(default)]
    pub journal_text: String,
}

impl DailyLog {
    /// A log carrying only a flow observation
    pub fn new(date: NaiveDate, flow: FlowLevel) -> Self {
        Self {
            date,
            flow,
            pain: None,
            energy: None,
            mood: None,
            journal_text: String::new(),
        }
    }

    pub fn with_pain(mut self, value: u8) -> Self {
        self.pain = Some(Score::new(value));
        self
    }

    pub fn with_energy(mut self, value: u8) -> Self {
        self.energy = Some(Score::new(value));
        self
    }

    pub fn with_mood(mut self, value: u8) -> Self {
        self.mood = Some(Score::new(value));
        self
    }

    pub fn with_journal(mut self, text: impl Into<String>) -> Self {
        self.journal_text = text.into();
        self
    }
}

/// Integer-encoded entry as kept by the on-device record store
///
/// The store writes `0` or `-1` for metrics the user never touched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDailyEntry {
    pub date: NaiveDate,
    pub bloodflow_category: i32,
    pub pain_category: i32,
    pub energy_category: i32,
    pub mood_category: i32,
    #[serde(default)]
    pub journal_text: String,
}

fn raw_score(value: i32) -> Option<Score> {
    if value <= 0 {
        None
    } else {
        Some(Score::new(value.min(i32::from(Score::MAX)) as u8))
    }
}

impl From<RawDailyEntry> for DailyLog {
    fn from(raw: RawDailyEntry) -> Self {
        DailyLog {
            date: raw.date,
            flow: FlowLevel::from_code(i64::from(raw.bloodflow_category)),
            pain: raw_score(raw.pain_category),
            energy: raw_score(raw.energy_category),
            mood: raw_score(raw.mood_category),
            journal_text: raw.journal_text,
        }
    }
}

/// Flow intensity by date; a date that is absent counts as no bleeding
pub type FlowMap = BTreeMap<NaiveDate, FlowLevel>;

// ============================================================================
// Calendar Types
// ============================================================================

/// A calendar month (e.g. `2026-03`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    /// Month containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date - Duration::days(i64::from(date.day0())),
        }
    }

    /// Build from year and 1-based month, `None` for an invalid month
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Duration::days(i64::from(self.length()) - 1)
    }

    /// Number of days in the month (28..=31)
    pub fn length(&self) -> u32 {
        match self.first_day.checked_add_months(Months::new(1)) {
            Some(next_first) => (next_first - self.first_day).num_days() as u32,
            // December of chrono's last year has no successor
            None => 31,
        }
    }

    /// Shift by a number of months, `None` past chrono's supported range
    pub fn plus_months(&self, months: i32) -> Option<Self> {
        let shift = Months::new(months.unsigned_abs());
        let first_day = if months >= 0 {
            self.first_day.checked_add_months(shift)
        } else {
            self.first_day.checked_sub_months(shift)
        };
        first_day.map(|first_day| Self { first_day })
    }

    /// Every date of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day;
        (0..i64::from(self.length())).map(move |offset| first + Duration::days(offset))
    }

    pub fn as_range(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| crate::Error::Other(format!("Invalid month '{}', expected YYYY-MM", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|e| crate::Error::Other(format!("Invalid year in '{}': {}", s, e)))?;
        let month: u32 = month
            .parse()
            .map_err(|e| crate::Error::Other(format!("Invalid month in '{}': {}", s, e)))?;
        Self::new(year, month)
            .ok_or_else(|| crate::Error::Other(format!("Month out of range: '{}'", s)))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

/// Inclusive range of calendar dates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `start` lies after `end`
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

// ============================================================================
// Forecast Output Types
// ============================================================================

/// Summary statistics of the recent cycles
///
/// Always fully populated: when nothing can be measured the configured
/// defaults are reported together with zero counts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodStats {
    pub avg_cycle_days: i64,
    pub avg_period_days: i64,
    pub cycles_count: usize,
    pub periods_count: usize,
}

/// Estimated daily values for one future calendar month
///
/// All four vectors hold exactly one value per day of `month`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPrediction {
    pub month: YearMonth,
    pub pain_by_day: Vec<f32>,
    pub mood_by_day: Vec<f32>,
    pub energy_by_day: Vec<f32>,
    pub bloodflow_by_day: Vec<f32>,
}
