//! Ovulation day estimates.
//!
//! Ovulation is placed a fixed luteal phase before the next expected period
//! start, i.e. at `cycle length - 14` days into every cycle.

use crate::stats::learned_cycle_days;
use crate::{DateRange, ForecastConfig};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Assumed days between ovulation and the following period start
pub const LUTEAL_PHASE_DAYS: i64 = 14;

/// Estimated ovulation days inside `range`, past cycles included
///
/// Cycles are laid out on the learned cycle length around the last start.
/// Returns an empty set when there are no starts.
pub fn predict_ovulation_days(
    starts: &[NaiveDate],
    range: DateRange,
    settings: &ForecastConfig,
) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();
    let Some(&last_start) = starts.last() else {
        return days;
    };
    if range.is_empty() {
        return days;
    }

    let cycle_days = learned_cycle_days(starts, settings.max_cycles, settings.default_cycle_days);
    let ovulation_offset = cycle_days - LUTEAL_PHASE_DAYS;
    let cycle = Duration::days(cycle_days);

    // Back up whole cycles until the cycle ends before the range begins
    let mut cycle_start = last_start;
    while cycle_start
        .checked_add_signed(cycle)
        .map_or(true, |end| end > range.start)
    {
        let Some(previous) = cycle_start.checked_sub_signed(cycle) else {
            break;
        };
        cycle_start = previous;
    }

    while cycle_start <= range.end {
        if let Some(ovulation) = cycle_start.checked_add_signed(Duration::days(ovulation_offset)) {
            if range.contains(ovulation) {
                days.insert(ovulation);
            }
        }
        let Some(next) = cycle_start.checked_add_signed(cycle) else {
            break;
        };
        cycle_start = next;
    }

    tracing::debug!(
        "Estimated {} ovulation days in {}..={} (cycle {} days)",
        days.len(),
        range.start,
        range.end,
        cycle_days
    );

    days
}
