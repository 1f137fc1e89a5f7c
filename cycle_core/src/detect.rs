//! Period-start detection.
//!
//! A date starts a period when there is bleeding on it and none the day
//! before. Days that were never logged count as no bleeding.

use crate::{FlowLevel, FlowMap};
use chrono::{Months, NaiveDate};

/// Intensity on a date, treating unlogged dates as no bleeding
pub(crate) fn flow_on(flows: &FlowMap, date: NaiveDate) -> FlowLevel {
    flows.get(&date).copied().unwrap_or_default()
}

/// First date of the trailing window that ends on `today`
pub fn window_start(today: NaiveDate, months_back: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(NaiveDate::MIN)
}

/// Restrict flows to the last `months_back` calendar months, `today` included
///
/// Old history is left out so a stale anomaly can't dominate the inference.
pub fn trailing_window(flows: &FlowMap, today: NaiveDate, months_back: u32) -> FlowMap {
    let start = window_start(today, months_back);
    if start > today {
        return FlowMap::new();
    }
    flows
        .range(start..=today)
        .map(|(date, flow)| (*date, *flow))
        .collect()
}

/// Every date whose bleeding follows a day without bleeding, ascending
pub fn detect_period_starts(flows: &FlowMap) -> Vec<NaiveDate> {
    flows
        .iter()
        .filter(|(_, flow)| flow.is_bleeding())
        .filter(|(date, _)| {
            date.pred_opt()
                .map_or(true, |previous| !flow_on(flows, previous).is_bleeding())
        })
        .map(|(date, _)| *date)
        .collect()
}

/// Period starts within the trailing window ending on `today`
///
/// A bleeding entry dated `today` is eligible like any other day.
pub fn detect_recent_period_starts(
    flows: &FlowMap,
    today: NaiveDate,
    months_back: u32,
) -> Vec<NaiveDate> {
    detect_period_starts(&trailing_window(flows, today, months_back))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flows(entries: &[(NaiveDate, i64)]) -> FlowMap {
        entries
            .iter()
            .map(|(d, code)| (*d, FlowLevel::from_code(*code)))
            .collect()
    }

    #[test]
    fn test_empty_flows_have_no_starts() {
        assert!(detect_period_starts(&FlowMap::new()).is_empty());
    }

    #[test]
    fn test_single_episode() {
        let flows = flows(&[
            (date(2026, 1, 1), 3),
            (date(2026, 1, 2), 2),
            (date(2026, 1, 3), 0),
        ]);
        assert_eq!(detect_period_starts(&flows), vec![date(2026, 1, 1)]);
    }

    #[test]
    fn test_unlogged_gap_starts_new_episode() {
        // Jan 3 was never logged, so Jan 4 begins a new episode
        let flows = flows(&[
            (date(2026, 1, 1), 2),
            (date(2026, 1, 2), 1),
            (date(2026, 1, 4), 1),
            (date(2026, 1, 29), 3),
        ]);
        assert_eq!(
            detect_period_starts(&flows),
            vec![date(2026, 1, 1), date(2026, 1, 4), date(2026, 1, 29)]
        );
    }

    #[test]
    fn test_trailing_window_drops_stale_history() {
        let today = date(2026, 5, 15);
        let flows = flows(&[
            (date(2026, 1, 10), 3),
            (date(2026, 2, 14), 3),
            (date(2026, 2, 15), 3),
            (date(2026, 4, 20), 2),
            (date(2026, 5, 16), 3),
        ]);

        let window = trailing_window(&flows, today, 3);
        assert_eq!(window.keys().next(), Some(&date(2026, 2, 15)));
        assert!(!window.contains_key(&date(2026, 5, 16)));

        // Feb 15 is the first visible bleeding day, so it reads as a start
        assert_eq!(
            detect_recent_period_starts(&flows, today, 3),
            vec![date(2026, 2, 15), date(2026, 4, 20)]
        );
    }

    #[test]
    fn test_today_can_be_a_start() {
        let today = date(2026, 5, 15);
        let flows = flows(&[(date(2026, 5, 14), 0), (today, 2)]);
        assert_eq!(detect_recent_period_starts(&flows, today, 3), vec![today]);
    }

    #[test]
    fn test_first_representable_day_can_start() {
        let flows = flows(&[(NaiveDate::MIN, 3), (NaiveDate::MIN.succ_opt().unwrap(), 2)]);
        assert_eq!(detect_period_starts(&flows), vec![NaiveDate::MIN]);
    }
}
