// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Five-day outlook.

use crate::classifier::{precipitation_chance, PrecipitationChance};
use crate::profile::round_dp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of days in an outlook.
pub const FORECAST_DAYS: usize = 5;

/// Daily temperature span in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: DateTime<Utc>,
    pub temperature: TemperatureRange,
    /// Relative humidity in %.
    pub humidity: f64,
    /// Chance of rain, 0-100.
    pub precipitation: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastDay {
    fn new(
        date: DateTime<Utc>,
        (min, max): (f64, f64),
        humidity: f64,
        precipitation: f64,
        description: &str,
        icon: &str,
    ) -> Self {
        Self {
            date,
            temperature: TemperatureRange { min, max },
            humidity,
            precipitation,
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Rain chance bucket.
    pub fn precipitation_chance(&self) -> PrecipitationChance {
        precipitation_chance(self.precipitation)
    }

    /// Rain is more likely than not.
    pub fn is_rainy(&self) -> bool {
        self.precipitation > 50.0
    }
}

/// Aggregate figures shown under the outlook.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    /// Mean daily maximum, rounded to a whole degree.
    pub mean_max_temperature: f64,
    /// Mean humidity, rounded to a whole percent.
    pub mean_humidity: f64,
    /// Days with more than 50% chance of rain.
    pub rainy_days: usize,
}

/// Fixed five-day outlook, in date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    days: [ForecastDay; FORECAST_DAYS],
}

impl Forecast {
    pub fn new(days: [ForecastDay; FORECAST_DAYS]) -> Self {
        Self { days }
    }

    /// The station's standing outlook, starting at `now`.
    pub fn outlook(now: DateTime<Utc>) -> Self {
        let day = |n: i64| now + Duration::hours(24 * n);
        Self::new([
            ForecastDay::new(day(0), (18.0, 26.0), 68.0, 10.0, "Partly cloudy", "⛅"),
            ForecastDay::new(day(1), (20.0, 28.0), 65.0, 5.0, "Sunny", "☀️"),
            ForecastDay::new(day(2), (17.0, 24.0), 75.0, 60.0, "Light rain", "🌧️"),
            ForecastDay::new(day(3), (19.0, 27.0), 62.0, 15.0, "Partly cloudy", "⛅"),
            ForecastDay::new(day(4), (21.0, 29.0), 58.0, 0.0, "Sunny", "☀️"),
        ])
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    pub fn summary(&self) -> ForecastSummary {
        let n = self.days.len() as f64;
        let max_sum: f64 = self.days.iter().map(|d| d.temperature.max).sum();
        let humidity_sum: f64 = self.days.iter().map(|d| d.humidity).sum();
        ForecastSummary {
            mean_max_temperature: round_dp(max_sum / n, 0),
            mean_humidity: round_dp(humidity_sum / n, 0),
            rainy_days: self.days.iter().filter(|d| d.is_rainy()).count(),
        }
    }
}
