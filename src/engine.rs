// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Telemetry engine.
//!
//! Ties the generator, the history window and the classifier together.
//! Each [`TelemetryEngine::tick`] generates a live reading, pushes it into
//! the window and classifies it against the reading it replaced.
//!
//! The engine is single-threaded. Hosts that share it between tasks must
//! put it behind one lock so a snapshot never sees half of a push.

use crate::alerts::{Alert, AlertBoard, SeverityCounts};
use crate::classifier::{indicators, temperature_band, Indicator, TemperatureBand};
use crate::clock::Clock;
use crate::error::Result;
use crate::forecast::{Forecast, ForecastSummary};
use crate::generator::{GeneratorConfig, SampleGenerator};
use crate::history::{HistoryWindow, DEFAULT_CAPACITY};
use crate::reading::Reading;
use crate::station::Station;
use crate::stats::DaySummary;
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Readings kept in the rolling window.
    pub history_capacity: usize,
    /// Sample generator settings.
    pub generator: GeneratorConfig,
    /// Station reference data.
    pub station: Station,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            generator: GeneratorConfig::default(),
            station: Station::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_station(mut self, station: Station) -> Self {
        self.station = station;
        self
    }
}

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub reading: Reading,
    pub indicators: Vec<Indicator>,
}

/// Everything the dashboard renders, in one consistent view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub station: &'a Station,
    pub current: &'a Reading,
    pub indicators: Vec<Indicator>,
    pub marker_band: TemperatureBand,
    pub summary: Option<DaySummary>,
    pub alerts: Vec<&'a Alert>,
    pub alert_counts: SeverityCounts,
    pub forecast: &'a Forecast,
    pub forecast_summary: ForecastSummary,
}

/// Synthetic telemetry pipeline.
#[derive(Debug)]
pub struct TelemetryEngine {
    generator: SampleGenerator,
    history: HistoryWindow,
    current: Reading,
    previous: Option<Reading>,
    alerts: AlertBoard,
    forecast: Forecast,
    station: Station,
}

impl TelemetryEngine {
    /// Build an engine on the system clock.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let generator = SampleGenerator::new(config.generator.clone())?;
        Self::with_generator(config, generator)
    }

    /// Build an engine on a custom clock.
    pub fn with_clock(config: EngineConfig, clock: impl Clock + 'static) -> Result<Self> {
        let generator = SampleGenerator::with_clock(config.generator.clone(), clock)?;
        Self::with_generator(config, generator)
    }

    /// Build an engine around an existing generator.
    ///
    /// The window is prefilled with a full history and a first live
    /// reading is taken; it is not pushed into the window.
    pub fn with_generator(config: EngineConfig, mut generator: SampleGenerator) -> Result<Self> {
        let history = HistoryWindow::prefilled(&mut generator, config.history_capacity)?;
        let current = generator.generate_current();
        let now = generator.now();

        log::debug!(
            "engine started for {} with {} historical readings",
            config.station.id,
            history.len()
        );

        Ok(Self {
            generator,
            history,
            current,
            previous: None,
            alerts: AlertBoard::demo(now),
            forecast: Forecast::outlook(now),
            station: config.station,
        })
    }

    /// Take a new live reading and fold it into the window.
    pub fn tick(&mut self) -> Update {
        let reading = self.generator.generate_current();
        self.history.push(reading.clone());
        let previous = std::mem::replace(&mut self.current, reading.clone());
        self.previous = Some(previous);

        let indicators = indicators(&self.current, self.previous.as_ref());
        log::debug!(
            "tick {}: {:.1}°C {:.1}% {:.1} hPa",
            reading.id,
            reading.temperature,
            reading.humidity,
            reading.pressure
        );
        Update {
            reading,
            indicators,
        }
    }

    /// Latest live reading.
    pub fn current(&self) -> &Reading {
        &self.current
    }

    /// Live reading before the latest one.
    pub fn previous(&self) -> Option<&Reading> {
        self.previous.as_ref()
    }

    /// Tile attributes of the latest reading.
    pub fn indicators(&self) -> Vec<Indicator> {
        indicators(&self.current, self.previous.as_ref())
    }

    pub fn history(&self) -> &HistoryWindow {
        &self.history
    }

    /// Window contents, oldest first.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.history.snapshot()
    }

    /// Day panel figures over the window.
    pub fn summary(&self) -> Result<DaySummary> {
        DaySummary::compute(&self.history.snapshot())
    }

    pub fn alerts(&self) -> &AlertBoard {
        &self.alerts
    }

    /// Mark an alert inactive; unknown ids are a no-op.
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        self.alerts.dismiss(id)
    }

    /// Add an alert to the board.
    pub fn raise_alert(&mut self, alert: Alert) {
        self.alerts.raise(alert);
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Consistent view of everything the dashboard shows.
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard {
            station: &self.station,
            current: &self.current,
            indicators: self.indicators(),
            marker_band: temperature_band(self.current.temperature),
            summary: self.summary().ok(),
            alerts: self.alerts.active(),
            alert_counts: self.alerts.counts(),
            forecast: &self.forecast,
            forecast_summary: self.forecast.summary(),
        }
    }
}
