// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Telemetry reading model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped multi-metric sample from the station.
///
/// Readings are only ever built by the sample generator and are not
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Opaque identifier (`data-{i}` for history, `current-{ms}` for live).
    pub id: String,
    /// Sample instant.
    pub timestamp: DateTime<Utc>,
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %. Not clamped to 0-100.
    pub humidity: f64,
    /// Barometric pressure in hPa. Not clamped.
    pub pressure: f64,
    /// UV index, never negative.
    pub uv_index: f64,
    /// Wind speed in km/h, never negative.
    pub wind_speed: f64,
    /// Wind direction in degrees, nominally 0-360.
    pub wind_direction: f64,
    /// Precipitation in mm, never negative.
    pub precipitation: f64,
    /// Ambient light in lux, never negative.
    pub light_level: f64,
}

impl Reading {
    /// Value of one metric.
    pub fn get(&self, metric: Metric) -> f64 {
        metric.value_of(self)
    }
}

/// Scalar fields of a [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
    UvIndex,
    WindSpeed,
    WindDirection,
    Precipitation,
    LightLevel,
}

impl Metric {
    /// Every metric, in tile order.
    pub const ALL: [Metric; 8] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::UvIndex,
        Metric::WindSpeed,
        Metric::WindDirection,
        Metric::Precipitation,
        Metric::LightLevel,
    ];

    /// Read this metric out of a reading.
    pub fn value_of(self, reading: &Reading) -> f64 {
        match self {
            Metric::Temperature => reading.temperature,
            Metric::Humidity => reading.humidity,
            Metric::Pressure => reading.pressure,
            Metric::UvIndex => reading.uv_index,
            Metric::WindSpeed => reading.wind_speed,
            Metric::WindDirection => reading.wind_direction,
            Metric::Precipitation => reading.precipitation,
            Metric::LightLevel => reading.light_level,
        }
    }

    /// Unit of measurement.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Pressure => "hPa",
            Metric::UvIndex => "UV",
            Metric::WindSpeed => "km/h",
            Metric::WindDirection => "°",
            Metric::Precipitation => "mm",
            Metric::LightLevel => "lux",
        }
    }

    /// Wire name, matching the serialized reading field.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
            Metric::UvIndex => "uvIndex",
            Metric::WindSpeed => "windSpeed",
            Metric::WindDirection => "windDirection",
            Metric::Precipitation => "precipitation",
            Metric::LightLevel => "lightLevel",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
