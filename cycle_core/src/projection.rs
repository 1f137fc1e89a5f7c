//! Projection of future bleeding days.
//!
//! The learned flow pattern is laid down again every learned cycle length,
//! starting one cycle after the most recent period start.

use crate::detect::{detect_recent_period_starts, trailing_window};
use crate::pattern::learn_flow_pattern;
use crate::stats::learned_cycle_days;
use crate::{DateRange, FlowLevel, FlowMap, ForecastConfig};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Predicted flow for days inside `range` that lie strictly after `today`
///
/// Returns an empty map when no period start is visible in the trailing
/// window: nothing is predicted without at least one real period.
pub fn predict_future_flow_in_range(
    flows: &FlowMap,
    range: DateRange,
    today: NaiveDate,
    settings: &ForecastConfig,
) -> BTreeMap<NaiveDate, FlowLevel> {
    let mut predicted = BTreeMap::new();
    if range.is_empty() {
        return predicted;
    }

    let starts = detect_recent_period_starts(flows, today, settings.months_back);
    let Some(&last_start) = starts.last() else {
        tracing::debug!("No period start logged, skipping flow prediction");
        return predicted;
    };

    let window = trailing_window(flows, today, settings.months_back);
    let cycle_days = learned_cycle_days(&starts, settings.max_cycles, settings.default_cycle_days);
    let pattern = learn_flow_pattern(&window, &starts);

    // Stepping stops at the end of the representable calendar
    let cycle = Duration::days(cycle_days);
    let mut next_start = last_start.checked_add_signed(cycle);
    while let Some(start) = next_start.filter(|start| *start <= range.end) {
        for (offset, flow) in pattern.iter().enumerate() {
            let Some(day) = start.checked_add_signed(Duration::days(offset as i64)) else {
                break;
            };
            if day > today && range.contains(day) {
                predicted.insert(day, *flow);
            }
        }
        next_start = start.checked_add_signed(cycle);
    }

    tracing::debug!(
        "Predicted {} bleeding days in {}..={} (cycle {} days, last start {})",
        predicted.len(),
        range.start,
        range.end,
        cycle_days,
        last_start
    );

    predicted
}
