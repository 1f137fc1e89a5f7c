#![forbid(unsafe_code)]

//! Forecast engine for daily cycle logs.
//!
//! This crate provides:
//! - Domain types (daily logs, flow levels, scores, months)
//! - Log snapshots and their read-only queries
//! - Period-start detection and cycle statistics
//! - Bleeding-day and monthly metric projections
//! - Ovulation estimates
//!
//! Every forecast is a pure function of a [`LogSnapshot`], a
//! [`ForecastConfig`] and the caller's notion of "today".

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod snapshot;
pub mod detect;
pub mod stats;
pub mod pattern;
pub mod projection;
pub mod monthly;
pub mod ovulation;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, ForecastConfig, LoggingConfig};
pub use snapshot::{mark_period_days, read_json_lines, LogSnapshot};
pub use detect::{detect_period_starts, detect_recent_period_starts};
pub use stats::calculate_period_stats;
pub use pattern::learn_flow_pattern;
pub use projection::predict_future_flow_in_range;
pub use monthly::predict_next_months;
pub use ovulation::predict_ovulation_days;
pub use engine::{CalendarForecast, Forecaster};
