// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Aggregate statistics over a run of readings.
//!
//! Every aggregate fails with [`TelemetryError::EmptyWindow`] on an empty
//! slice instead of producing NaN or infinities.

use crate::error::{Result, TelemetryError};
use crate::profile::round_dp;
use crate::reading::{Metric, Reading};
use serde::{Deserialize, Serialize};

fn values(readings: &[Reading], metric: Metric) -> Result<impl Iterator<Item = f64> + '_> {
    if readings.is_empty() {
        return Err(TelemetryError::EmptyWindow { metric });
    }
    Ok(readings.iter().map(move |r| metric.value_of(r)))
}

/// Largest value of `metric`.
pub fn max_of(readings: &[Reading], metric: Metric) -> Result<f64> {
    Ok(values(readings, metric)?.fold(f64::NEG_INFINITY, f64::max))
}

/// Smallest value of `metric`.
pub fn min_of(readings: &[Reading], metric: Metric) -> Result<f64> {
    Ok(values(readings, metric)?.fold(f64::INFINITY, f64::min))
}

/// Arithmetic mean of `metric`.
pub fn mean_of(readings: &[Reading], metric: Metric) -> Result<f64> {
    let sum: f64 = values(readings, metric)?.sum();
    Ok(sum / readings.len() as f64)
}

/// Min, max and mean of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl WindowStats {
    /// Compute all three aggregates in one pass.
    pub fn compute(readings: &[Reading], metric: Metric) -> Result<Self> {
        let (min, max, sum) = values(readings, metric)?.fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), v| (min.min(v), max.max(v), sum + v),
        );
        Ok(Self {
            min,
            max,
            mean: sum / readings.len() as f64,
            count: readings.len(),
        })
    }
}

/// Summary figures for the day panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub max_temperature: f64,
    pub min_temperature: f64,
    /// Rounded to a whole percent.
    pub mean_humidity: f64,
    pub max_uv_index: f64,
}

impl DaySummary {
    pub fn compute(readings: &[Reading]) -> Result<Self> {
        Ok(Self {
            max_temperature: max_of(readings, Metric::Temperature)?,
            min_temperature: min_of(readings, Metric::Temperature)?,
            mean_humidity: round_dp(mean_of(readings, Metric::Humidity)?, 0),
            max_uv_index: max_of(readings, Metric::UvIndex)?,
        })
    }
}
