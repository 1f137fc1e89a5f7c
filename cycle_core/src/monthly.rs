//! Monthly projection of daily metrics (pain, mood, energy, flow).
//!
//! Recent cycles are aligned on their start day and averaged into a cycle
//! profile, which is then tiled over the upcoming calendar months.

use crate::detect::{detect_period_starts, window_start};
use crate::stats::learned_cycle_days;
use crate::{
    DailyLog, DateRange, ForecastConfig, LogSnapshot, MonthlyPrediction, Score, YearMonth,
};
use chrono::{Duration, NaiveDate};

/// At most this many most recent starts (three full cycles) feed the profile
const MAX_PROFILE_STARTS: usize = 4;

/// Last cycle-day offset visited in a single cycle
const MAX_CYCLE_WALK: usize = 60;

/// Bounds for the learned bleeding stretch at the head of the profile
const MIN_PERIOD_DAYS: usize = 3;
const MAX_PERIOD_DAYS: usize = 10;

const MAX_SCORE: f32 = Score::MAX as f32;
const MAX_FLOW: f32 = 3.0;

/// Averaged values for one cycle-day offset; `None` where nothing was logged
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct CycleDay {
    pain: Option<f32>,
    mood: Option<f32>,
    energy: Option<f32>,
    flow: Option<f32>,
}

impl CycleDay {
    fn is_bleeding(&self) -> bool {
        self.flow.unwrap_or(0.0) > 0.0
    }

    /// Fill unknown metrics from `fallback`
    fn or(self, fallback: &CycleDay) -> CycleDay {
        CycleDay {
            pain: self.pain.or(fallback.pain),
            mood: self.mood.or(fallback.mood),
            energy: self.energy.or(fallback.energy),
            flow: self.flow.or(fallback.flow),
        }
    }
}

/// Observations bucketed by cycle-day offset
#[derive(Default)]
struct OffsetBuckets {
    pain: Vec<Vec<f32>>,
    mood: Vec<Vec<f32>>,
    energy: Vec<Vec<f32>>,
    flow: Vec<Vec<f32>>,
}

impl OffsetBuckets {
    fn ensure_len(&mut self, len: usize) {
        if self.flow.len() < len {
            self.pain.resize_with(len, Vec::new);
            self.mood.resize_with(len, Vec::new);
            self.energy.resize_with(len, Vec::new);
            self.flow.resize_with(len, Vec::new);
        }
    }

    fn record(&mut self, offset: usize, log: &DailyLog) {
        self.ensure_len(offset + 1);

        // Unset metrics are skipped; a logged flow is always an observation.
        if let Some(pain) = log.pain {
            self.pain[offset].push(f32::from(pain.value()));
        }
        if let Some(mood) = log.mood {
            self.mood[offset].push(f32::from(mood.value()));
        }
        if let Some(energy) = log.energy {
            self.energy[offset].push(f32::from(energy.value()));
        }
        self.flow[offset].push(f32::from(log.flow.code()));
    }

    fn profile(&self) -> Vec<CycleDay> {
        (0..self.flow.len())
            .map(|i| CycleDay {
                pain: mean(&self.pain[i]),
                mood: mean(&self.mood[i]),
                energy: mean(&self.energy[i]),
                flow: mean(&self.flow[i]),
            })
            .collect()
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

fn mean_of(values: impl Iterator<Item = Option<f32>>) -> Option<f32> {
    let known: Vec<f32> = values.flatten().collect();
    mean(&known)
}

/// Average of the non-bleeding profile days, flow fixed at zero
fn baseline(profile: &[CycleDay]) -> CycleDay {
    let quiet: Vec<&CycleDay> = profile.iter().filter(|day| !day.is_bleeding()).collect();
    CycleDay {
        pain: mean_of(quiet.iter().map(|d| d.pain)),
        mood: mean_of(quiet.iter().map(|d| d.mood)),
        energy: mean_of(quiet.iter().map(|d| d.energy)),
        flow: Some(0.0),
    }
}

/// Profile stretched or cut to exactly `cycle_days` slots
///
/// Bleeding is only kept for the leading `period_days` slots so a period
/// never repeats inside one tiled cycle.
fn effective_profile(profile: &[CycleDay], cycle_days: usize) -> Vec<CycleDay> {
    let period_days = profile
        .iter()
        .take_while(|day| day.is_bleeding())
        .count()
        .clamp(MIN_PERIOD_DAYS, MAX_PERIOD_DAYS);
    let base = baseline(profile);

    (0..cycle_days)
        .map(|i| match profile.get(i) {
            Some(day) => {
                let mut day = day.or(&base);
                if i >= period_days {
                    day.flow = Some(0.0);
                }
                day
            }
            None => base,
        })
        .collect()
}

/// Estimated daily metrics for the `months_ahead` months following `base_month`
///
/// Uses the logs of the trailing `months_back` window ending on `today` and
/// needs at least two period starts there (one full cycle); otherwise nothing
/// is predicted.
pub fn predict_next_months(
    logs: &LogSnapshot,
    base_month: YearMonth,
    today: NaiveDate,
    settings: &ForecastConfig,
) -> Vec<MonthlyPrediction> {
    let window = logs.in_range(DateRange::new(
        window_start(today, settings.months_back),
        today,
    ));
    let all_starts = detect_period_starts(&window.flows());
    if all_starts.len() < 2 {
        tracing::debug!(
            "Only {} period starts in window, need 2 for monthly predictions",
            all_starts.len()
        );
        return Vec::new();
    }

    let starts = &all_starts[all_starts.len().saturating_sub(MAX_PROFILE_STARTS)..];

    let mut buckets = OffsetBuckets::default();
    for cycle in starts.windows(2) {
        let (start, next_start) = (cycle[0], cycle[1]);
        for offset in 0..=MAX_CYCLE_WALK {
            let day = start + Duration::days(offset as i64);
            if day >= next_start {
                break;
            }
            if let Some(log) = window.get(day) {
                buckets.record(offset, log);
            }
        }
    }

    let profile = buckets.profile();
    if profile.is_empty() {
        return Vec::new();
    }

    let cycle_days = learned_cycle_days(starts, starts.len(), settings.default_cycle_days);
    let effective = effective_profile(&profile, cycle_days as usize);
    let last_start = starts[starts.len() - 1];

    let predictions: Vec<MonthlyPrediction> = (1..=settings.months_ahead)
        .map_while(|ahead| base_month.plus_months(ahead as i32))
        .map(|month| tile_month(month, &effective, last_start, cycle_days))
        .collect();

    tracing::debug!(
        "Projected {} months from {} cycles (cycle {} days, profile {} days)",
        predictions.len(),
        starts.len() - 1,
        cycle_days,
        profile.len()
    );

    predictions
}

/// Read the profile off for every day of `month`
fn tile_month(
    month: YearMonth,
    profile: &[CycleDay],
    last_start: NaiveDate,
    cycle_days: i64,
) -> MonthlyPrediction {
    let len = month.length() as usize;
    let mut prediction = MonthlyPrediction {
        month,
        pain_by_day: Vec::with_capacity(len),
        mood_by_day: Vec::with_capacity(len),
        energy_by_day: Vec::with_capacity(len),
        bloodflow_by_day: Vec::with_capacity(len),
    };

    for date in month.days() {
        let offset = (date - last_start).num_days().rem_euclid(cycle_days) as usize;
        let day = profile[offset];

        prediction.pain_by_day.push(day.pain.unwrap_or(0.0).clamp(0.0, MAX_SCORE));
        prediction.mood_by_day.push(day.mood.unwrap_or(0.0).clamp(0.0, MAX_SCORE));
        prediction.energy_by_day.push(day.energy.unwrap_or(0.0).clamp(0.0, MAX_SCORE));
        prediction.bloodflow_by_day.push(day.flow.unwrap_or(0.0).clamp(0.0, MAX_FLOW));
    }

    prediction
}
