//! Immutable, date-keyed snapshot of daily logs.
//!
//! The record store owns the logs; the engine only ever sees a snapshot
//! handed over by value. This module builds such snapshots (from memory or a
//! JSON-lines export) and answers the read-only queries the screens need.

use crate::{DailyLog, DateRange, FlowLevel, FlowMap, Result, YearMonth};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read-only view of all logs, one per calendar date
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogSnapshot {
    logs: BTreeMap<NaiveDate, DailyLog>,
}

impl LogSnapshot {
    /// Build a snapshot from logs in any order
    ///
    /// Dates are expected to be unique; if one repeats, the later log wins.
    pub fn from_logs(logs: impl IntoIterator<Item = DailyLog>) -> Self {
        let mut by_date = BTreeMap::new();
        for log in logs {
            let date = log.date;
            if by_date.insert(date, log).is_some() {
                tracing::warn!("Duplicate log for {}, keeping the later one", date);
            }
        }
        Self { logs: by_date }
    }

    /// Parse a snapshot from JSON lines, one `DailyLog` per line
    ///
    /// Blank lines are ignored and malformed lines are skipped with a warning.
    pub fn from_json_lines(reader: impl BufRead) -> Result<Self> {
        let mut logs = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<DailyLog>(&line) {
                Ok(log) => logs.push(log),
                Err(e) => {
                    tracing::warn!("Failed to parse log at line {}: {}", line_num + 1, e);
                }
            }
        }

        tracing::debug!("Parsed {} logs from JSON lines", logs.len());
        Ok(Self::from_logs(logs))
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.logs.get(&date)
    }

    /// All logs in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = &DailyLog> {
        self.logs.values()
    }

    /// Flow intensity by date, the input of the bleeding forecasts
    pub fn flows(&self) -> FlowMap {
        self.logs
            .iter()
            .map(|(date, log)| (*date, log.flow))
            .collect()
    }

    /// Sub-snapshot of the logs inside an inclusive date range
    pub fn in_range(&self, range: DateRange) -> LogSnapshot {
        if range.is_empty() {
            return LogSnapshot::default();
        }
        LogSnapshot {
            logs: self
                .logs
                .range(range.start..=range.end)
                .map(|(date, log)| (*date, log.clone()))
                .collect(),
        }
    }

    /// Logs of one calendar month
    pub fn in_month(&self, month: YearMonth) -> LogSnapshot {
        self.in_range(month.as_range())
    }

    /// Logs from `days` days before `today` up to and including `today`
    pub fn last_days(&self, today: NaiveDate, days: u32) -> LogSnapshot {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        self.in_range(DateRange::new(start, today))
    }

    /// Logs with a non-empty journal text, newest first
    pub fn journal_entries(&self) -> Vec<&DailyLog> {
        self.logs
            .values()
            .rev()
            .filter(|log| !log.journal_text.trim().is_empty())
            .collect()
    }
}

impl FromIterator<DailyLog> for LogSnapshot {
    fn from_iter<I: IntoIterator<Item = DailyLog>>(iter: I) -> Self {
        Self::from_logs(iter)
    }
}

/// Read a JSON-lines snapshot export from disk
///
/// A missing file yields an empty snapshot.
pub fn read_json_lines(path: &Path) -> Result<LogSnapshot> {
    if !path.exists() {
        tracing::debug!("No snapshot file at {:?}, starting empty", path);
        return Ok(LogSnapshot::default());
    }

    let file = File::open(path)?;
    let snapshot = LogSnapshot::from_json_lines(BufReader::new(file))?;
    tracing::info!("Loaded {} logs from {:?}", snapshot.len(), path);
    Ok(snapshot)
}

/// Logs for a set of days the user marked as bleeding in one go
///
/// The first day is heavy, the last light and the days between medium;
/// a single marked day is heavy. Metrics stay unset.
pub fn mark_period_days(days: &[NaiveDate]) -> Vec<DailyLog> {
    let mut sorted = days.to_vec();
    sorted.sort();
    sorted.dedup();

    let last = sorted.len().saturating_sub(1);
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let flow = match index {
                0 => FlowLevel::Heavy,
                i if i == last => FlowLevel::Light,
                _ => FlowLevel::Medium,
            };
            DailyLog::new(date, flow)
        })
        .collect()
}
