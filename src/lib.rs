// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! # AgroClima
//!
//! Synthetic telemetry and classification engine for a simulated
//! agricultural weather station.
//!
//! ## Key Features
//!
//! - **Sample generation**: sinusoidal base curves with bounded uniform noise
//! - **Rolling history**: fixed-capacity window that evicts the oldest reading
//! - **Classification**: trends, threshold buckets and display tones
//! - **Aggregates**: max/min/mean over the window, failing fast when empty
//!
//! ## Quick Start
//!
//! ```rust
//! use agroclima::{EngineConfig, GeneratorConfig, Metric, TelemetryEngine};
//!
//! let config = EngineConfig::new()
//!     .with_history_capacity(24)
//!     .with_generator(GeneratorConfig::new().with_seed(42));
//! let mut engine = TelemetryEngine::new(config).unwrap();
//!
//! // One refresh: generate, push, classify
//! let update = engine.tick();
//! assert_eq!(update.indicators.len(), Metric::ALL.len());
//! assert_eq!(engine.history().len(), 24);
//!
//! let summary = engine.summary().unwrap();
//! assert!(summary.max_temperature >= summary.min_temperature);
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: Reading model and metric names
//! - [`profile`]: Base curves per metric
//! - [`generator`]: Live and historical sample generation
//! - [`history`]: Rolling history window
//! - [`classifier`]: Trends, buckets, tones and severities
//! - [`stats`]: Window aggregates
//! - [`alerts`], [`forecast`], [`station`]: Dashboard reference data
//! - [`engine`]: The pipeline tying it all together

// Modules
pub mod alerts;
pub mod classifier;
pub mod clock;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod history;
pub mod profile;
pub mod reading;
pub mod station;
pub mod stats;

// Re-exports for convenient access
pub use alerts::{Alert, AlertBoard, AlertKind, SeverityCounts};
pub use classifier::{
    bucketize, humidity_bucket, indicators, precipitation_chance, severity_rank,
    temperature_band, temperature_bucket, trend_of, uv_bucket, HumidityBucket, Indicator, Ladder,
    PrecipitationChance, Severity, TemperatureBand, TemperatureBucket, Tone, Trend, UvBucket,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Dashboard, EngineConfig, TelemetryEngine, Update};
pub use error::{Result, TelemetryError};
pub use forecast::{Forecast, ForecastDay, ForecastSummary, TemperatureRange, FORECAST_DAYS};
pub use generator::{GeneratorConfig, SampleGenerator};
pub use history::{HistoryWindow, DEFAULT_CAPACITY};
pub use profile::{CurveSpec, GenerationProfile};
pub use reading::{Metric, Reading};
pub use station::{GeoPoint, Station};
pub use stats::{max_of, mean_of, min_of, DaySummary, WindowStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
