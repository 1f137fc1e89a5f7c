//! Cycle statistics: average cycle length and average period length.
//!
//! Cycle lengths are the gaps between consecutive period starts. Only gaps
//! of 15..=60 days are believed; the learned average is always clamped to
//! [`MIN_CYCLE_DAYS`, `MAX_CYCLE_DAYS`], for reporting and projection alike.

use crate::config::{MAX_CYCLE_DAYS, MIN_CYCLE_DAYS};
use crate::detect::{detect_recent_period_starts, flow_on, trailing_window};
use crate::{FlowMap, ForecastConfig, PeriodStats};
use chrono::{Duration, NaiveDate};
use std::ops::RangeInclusive;

/// Gaps between starts that are plausible cycle lengths
const PLAUSIBLE_CYCLE_DAYS: RangeInclusive<i64> = 15..=60;

/// Longest bleeding run measured from a start
const MAX_PERIOD_RUN: i64 = 15;

/// Plausible gaps between consecutive starts, keeping only the last `max_cycles`
pub fn cycle_lengths(starts: &[NaiveDate], max_cycles: usize) -> Vec<i64> {
    let diffs: Vec<i64> = starts
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .filter(|days| PLAUSIBLE_CYCLE_DAYS.contains(days))
        .collect();

    let skip = diffs.len().saturating_sub(max_cycles);
    diffs[skip..].to_vec()
}

/// Rounded mean, half-way values rounding up
pub(crate) fn rounded_mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    Some(mean.round() as i64)
}

/// Cycle length to project with: the clamped average of the recent gaps,
/// or `default_cycle_days` when no gap is usable
pub fn learned_cycle_days(starts: &[NaiveDate], max_cycles: usize, default_cycle_days: i64) -> i64 {
    rounded_mean(&cycle_lengths(starts, max_cycles))
        .unwrap_or(default_cycle_days)
        .clamp(MIN_CYCLE_DAYS, MAX_CYCLE_DAYS)
}

/// Number of consecutive bleeding days beginning at `start`, capped at 15
pub fn period_length_from(flows: &FlowMap, start: NaiveDate) -> i64 {
    let mut length = 0;
    while length < MAX_PERIOD_RUN
        && start
            .checked_add_signed(Duration::days(length))
            .is_some_and(|day| flow_on(flows, day).is_bleeding())
    {
        length += 1;
    }
    length
}

/// Average cycle and period length over the trailing window ending `today`
///
/// Never fails: missing measurements fall back to the configured defaults
/// and are reported with a zero count.
pub fn calculate_period_stats(
    flows: &FlowMap,
    today: NaiveDate,
    settings: &ForecastConfig,
) -> PeriodStats {
    let window = trailing_window(flows, today, settings.months_back);
    let starts = detect_recent_period_starts(flows, today, settings.months_back);

    let period_lengths: Vec<i64> = starts
        .iter()
        .map(|start| period_length_from(&window, *start))
        .filter(|len| *len > 0)
        .collect();
    let avg_period_days =
        rounded_mean(&period_lengths).unwrap_or(settings.default_period_days);

    let cycles = cycle_lengths(&starts, settings.max_cycles);
    let avg_cycle_days = rounded_mean(&cycles)
        .unwrap_or(settings.default_cycle_days)
        .clamp(MIN_CYCLE_DAYS, MAX_CYCLE_DAYS);

    let stats = PeriodStats {
        avg_cycle_days,
        avg_period_days,
        cycles_count: cycles.len(),
        periods_count: starts.len(),
    };

    tracing::debug!(
        "Period stats over {} starts: cycle {} days ({} cycles), period {} days",
        starts.len(),
        stats.avg_cycle_days,
        stats.cycles_count,
        stats.avg_period_days
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlowLevel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Bleeding runs of `len` days starting at each date
    fn periods(starts: &[NaiveDate], len: i64) -> FlowMap {
        let mut flows = FlowMap::new();
        for start in starts {
            for i in 0..len {
                flows.insert(*start + Duration::days(i), FlowLevel::Medium);
            }
        }
        flows
    }

    #[test]
    fn test_empty_logs_use_defaults() {
        let stats = calculate_period_stats(&FlowMap::new(), date(2026, 3, 1), &ForecastConfig::default());
        assert_eq!(
            stats,
            PeriodStats {
                avg_cycle_days: 28,
                avg_period_days: 5,
                cycles_count: 0,
                periods_count: 0,
            }
        );
    }

    #[test]
    fn test_single_period_length() {
        let mut flows = FlowMap::new();
        flows.insert(date(2026, 1, 1), FlowLevel::Heavy);
        flows.insert(date(2026, 1, 2), FlowLevel::Medium);
        flows.insert(date(2026, 1, 3), FlowLevel::None);

        let stats = calculate_period_stats(&flows, date(2026, 1, 20), &ForecastConfig::default());
        assert_eq!(stats.avg_period_days, 2);
        assert_eq!(stats.periods_count, 1);
        assert_eq!(stats.cycles_count, 0);
        assert_eq!(stats.avg_cycle_days, 28);
    }

    #[test]
    fn test_average_of_recent_cycles() {
        let starts = [date(2026, 1, 1), date(2026, 1, 30), date(2026, 2, 28)];
        let flows = periods(&starts, 4);

        let stats = calculate_period_stats(&flows, date(2026, 3, 20), &ForecastConfig::default());
        assert_eq!(stats.avg_cycle_days, 29);
        assert_eq!(stats.avg_period_days, 4);
        assert_eq!(stats.cycles_count, 2);
        assert_eq!(stats.periods_count, 3);
    }

    #[test]
    fn test_implausible_gaps_are_ignored() {
        // 5-day gap is spotting, not a cycle
        let starts = [date(2026, 1, 1), date(2026, 1, 26), date(2026, 1, 31)];
        assert_eq!(cycle_lengths(&starts, 3), vec![25]);

        let starts = [date(2025, 1, 1), date(2025, 4, 1)];
        assert!(cycle_lengths(&starts, 3).is_empty());
    }

    #[test]
    fn test_only_last_cycles_count() {
        let starts = [
            date(2026, 1, 1),
            date(2026, 1, 21),
            date(2026, 2, 20),
            date(2026, 3, 22),
            date(2026, 4, 21),
        ];
        assert_eq!(cycle_lengths(&starts, 3), vec![30, 30, 30]);
        assert_eq!(learned_cycle_days(&starts, 3, 28), 30);
        assert_eq!(learned_cycle_days(&starts, 4, 28), 28); // (20+30+30+30)/4 = 27.5
    }

    #[test]
    fn test_learned_cycle_is_clamped() {
        let short = [date(2026, 1, 1), date(2026, 1, 17)];
        assert_eq!(learned_cycle_days(&short, 3, 28), MIN_CYCLE_DAYS);

        let long = [date(2026, 1, 1), date(2026, 2, 25)];
        assert_eq!(learned_cycle_days(&long, 3, 28), MAX_CYCLE_DAYS);

        assert_eq!(learned_cycle_days(&[], 3, 28), 28);
    }

    #[test]
    fn test_period_run_is_capped() {
        let flows = periods(&[date(2026, 1, 1)], 30);
        assert_eq!(period_length_from(&flows, date(2026, 1, 1)), 15);
    }

    #[test]
    fn test_counts_never_exceed_starts() {
        let starts = [date(2026, 1, 1), date(2026, 1, 29), date(2026, 2, 26)];
        let flows = periods(&starts, 3);
        let stats = calculate_period_stats(&flows, date(2026, 3, 10), &ForecastConfig::default());

        let detected = detect_recent_period_starts(&flows, date(2026, 3, 10), 3).len();
        assert!(stats.cycles_count <= detected);
        assert!(stats.periods_count <= detected);
    }

    #[test]
    fn test_stats_are_idempotent() {
        let flows = periods(&[date(2026, 1, 3), date(2026, 2, 1)], 5);
        let settings = ForecastConfig::default();
        let first = calculate_period_stats(&flows, date(2026, 2, 20), &settings);
        let second = calculate_period_stats(&flows, date(2026, 2, 20), &settings);
        assert_eq!(first, second);
    }
}
