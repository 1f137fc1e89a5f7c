//! Learning the typical bleeding pattern of a period.
//!
//! Intensities observed on the same day-of-period across several periods are
//! averaged, so one noisy period doesn't define the forecast.

use crate::detect::flow_on;
use crate::{FlowLevel, FlowMap};
use chrono::{Duration, NaiveDate};

/// Pattern used until at least one period has been observed (starts heavy)
pub const FALLBACK_PATTERN: [FlowLevel; 5] = [
    FlowLevel::Heavy,
    FlowLevel::Heavy,
    FlowLevel::Medium,
    FlowLevel::Medium,
    FlowLevel::Light,
];

/// Longest stretch of a single period that is learned from
const MAX_PATTERN_DAYS: usize = 10;

/// Average intensity per day-of-period over all given starts
///
/// Falls back to [`FALLBACK_PATTERN`] when no start has any bleeding day.
pub fn learn_flow_pattern(flows: &FlowMap, starts: &[NaiveDate]) -> Vec<FlowLevel> {
    let mut buckets: Vec<Vec<u8>> = Vec::new();

    for start in starts {
        for offset in 0..MAX_PATTERN_DAYS {
            let Some(day) = start.checked_add_signed(Duration::days(offset as i64)) else {
                break;
            };
            let flow = flow_on(flows, day);
            if !flow.is_bleeding() {
                break;
            }
            if buckets.len() <= offset {
                buckets.resize_with(offset + 1, Vec::new);
            }
            buckets[offset].push(flow.code());
        }
    }

    if buckets.is_empty() {
        tracing::debug!("No bleeding days to learn from, using fallback pattern");
        return FALLBACK_PATTERN.to_vec();
    }

    let pattern: Vec<FlowLevel> = buckets
        .iter()
        .map(|bucket| {
            let mean = bucket.iter().map(|&c| f64::from(c)).sum::<f64>() / bucket.len() as f64;
            FlowLevel::from_code(mean.round() as i64)
        })
        .collect();

    tracing::debug!(
        "Learned {}-day flow pattern from {} periods",
        pattern.len(),
        starts.len()
    );
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lay(flows: &mut FlowMap, start: NaiveDate, codes: &[i64]) {
        for (i, code) in codes.iter().enumerate() {
            flows.insert(start + Duration::days(i as i64), FlowLevel::from_code(*code));
        }
    }

    #[test]
    fn test_fallback_without_starts() {
        assert_eq!(learn_flow_pattern(&FlowMap::new(), &[]), FALLBACK_PATTERN.to_vec());
    }

    #[test]
    fn test_identical_periods_reproduce_pattern() {
        let mut flows = FlowMap::new();
        lay(&mut flows, date(2026, 1, 1), &[3, 2, 2, 1, 0]);
        lay(&mut flows, date(2026, 1, 29), &[3, 2, 2, 1, 0]);

        let pattern = learn_flow_pattern(&flows, &[date(2026, 1, 1), date(2026, 1, 29)]);
        assert_eq!(
            pattern,
            vec![FlowLevel::Heavy, FlowLevel::Medium, FlowLevel::Medium, FlowLevel::Light]
        );
    }

    #[test]
    fn test_offsets_are_averaged() {
        let mut flows = FlowMap::new();
        lay(&mut flows, date(2026, 1, 1), &[3, 1, 1]);
        lay(&mut flows, date(2026, 1, 29), &[2, 2]);

        // day 0: (3+2)/2 = 2.5 -> 3, day 1: (1+2)/2 = 1.5 -> 2, day 2: only the first period
        let pattern = learn_flow_pattern(&flows, &[date(2026, 1, 1), date(2026, 1, 29)]);
        assert_eq!(
            pattern,
            vec![FlowLevel::Heavy, FlowLevel::Medium, FlowLevel::Light]
        );
    }

    #[test]
    fn test_runaway_period_is_capped() {
        let mut flows = FlowMap::new();
        lay(&mut flows, date(2026, 1, 1), &[2; 25]);

        let pattern = learn_flow_pattern(&flows, &[date(2026, 1, 1)]);
        assert_eq!(pattern.len(), 10);
    }
}
