//! Forecaster: the engine's entry point for hosts.
//!
//! Binds a validated [`ForecastConfig`] once and exposes every forecast as a
//! method over a [`LogSnapshot`]:
//!
//! 1. **Period starts** within the trailing window
//! 2. **Statistics** (average cycle and period length)
//! 3. **Future flow** for a date range
//! 4. **Monthly metrics** for the coming months
//! 5. **Ovulation days** for a date range
//! 6. **Calendar month** view combining 3 and 5
//!
//! Every method is a pure function of its arguments, so a single
//! `Forecaster` can be shared between threads.

use crate::detect::detect_recent_period_starts;
use crate::monthly::predict_next_months;
use crate::ovulation::predict_ovulation_days;
use crate::projection::predict_future_flow_in_range;
use crate::stats::calculate_period_stats;
use crate::{
    DateRange, FlowLevel, ForecastConfig, LogSnapshot, MonthlyPrediction, PeriodStats, Result,
    YearMonth,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the calendar shows for one month on top of the logged days
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarForecast {
    pub month: YearMonth,
    pub predicted_flow: BTreeMap<NaiveDate, FlowLevel>,
    pub ovulation_days: BTreeSet<NaiveDate>,
}

/// Forecast entry point bound to one set of parameters
#[derive(Clone, Debug, Default)]
pub struct Forecaster {
    settings: ForecastConfig,
}

impl Forecaster {
    /// Create a forecaster, rejecting unusable parameters
    pub fn new(settings: ForecastConfig) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ForecastConfig {
        &self.settings
    }

    /// Period starts in the trailing window ending on `today`
    pub fn period_starts(&self, logs: &LogSnapshot, today: NaiveDate) -> Vec<NaiveDate> {
        detect_recent_period_starts(&logs.flows(), today, self.settings.months_back)
    }

    pub fn period_stats(&self, logs: &LogSnapshot, today: NaiveDate) -> PeriodStats {
        calculate_period_stats(&logs.flows(), today, &self.settings)
    }

    pub fn future_flow(
        &self,
        logs: &LogSnapshot,
        range: DateRange,
        today: NaiveDate,
    ) -> BTreeMap<NaiveDate, FlowLevel> {
        predict_future_flow_in_range(&logs.flows(), range, today, &self.settings)
    }

    /// Monthly metric curves for the months after `base_month`
    pub fn monthly_predictions(
        &self,
        logs: &LogSnapshot,
        base_month: YearMonth,
        today: NaiveDate,
    ) -> Vec<MonthlyPrediction> {
        predict_next_months(logs, base_month, today, &self.settings)
    }

    pub fn ovulation_days(
        &self,
        logs: &LogSnapshot,
        range: DateRange,
        today: NaiveDate,
    ) -> BTreeSet<NaiveDate> {
        let starts = self.period_starts(logs, today);
        predict_ovulation_days(&starts, range, &self.settings)
    }

    /// Predicted bleeding and ovulation days for one calendar month
    pub fn calendar_month(
        &self,
        logs: &LogSnapshot,
        month: YearMonth,
        today: NaiveDate,
    ) -> CalendarForecast {
        let range = month.as_range();
        let forecast = CalendarForecast {
            month,
            predicted_flow: self.future_flow(logs, range, today),
            ovulation_days: self.ovulation_days(logs, range, today),
        };

        tracing::debug!(
            "Calendar {}: {} predicted bleeding days, {} ovulation days",
            month,
            forecast.predicted_flow.len(),
            forecast.ovulation_days.len()
        );

        forecast
    }
}
