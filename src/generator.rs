// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Sample generation.
//!
//! Produces a single reading for "now" and backward-looking hourly
//! histories. Randomness and wall-clock time are both injected so tests
//! can pin them down.

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TelemetryError};
use crate::profile::{GenerationProfile, MAX_DECIMALS};
use crate::reading::{Metric, Reading};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Spacing between history samples in seconds.
    pub sample_interval_secs: i64,
    /// Curves for history samples.
    pub historical: GenerationProfile,
    /// Curves for the live reading.
    pub live: GenerationProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sample_interval_secs: 3600, // 1 hour
            historical: GenerationProfile::historical(),
            live: GenerationProfile::live(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set history spacing in seconds.
    pub fn with_sample_interval_secs(mut self, secs: i64) -> Self {
        self.sample_interval_secs = secs;
        self
    }

    /// Replace the history curves.
    pub fn with_historical(mut self, profile: GenerationProfile) -> Self {
        self.historical = profile;
        self
    }

    /// Replace the live curves.
    pub fn with_live(mut self, profile: GenerationProfile) -> Self {
        self.live = profile;
        self
    }

    /// Drop every noise band from both profiles.
    pub fn noiseless(mut self) -> Self {
        self.historical = self.historical.noiseless();
        self.live = self.live.noiseless();
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_secs <= 0 {
            return Err(TelemetryError::InvalidConfig(format!(
                "sample_interval_secs must be positive, got {}",
                self.sample_interval_secs
            )));
        }
        self.sample_interval()?;
        for profile in [&self.historical, &self.live] {
            for metric in Metric::ALL {
                let curve = profile.curve(metric);
                if !curve.noise.is_finite() || curve.noise < 0.0 {
                    return Err(TelemetryError::InvalidConfig(format!(
                        "{} noise must be a non-negative number, got {}",
                        metric, curve.noise
                    )));
                }
                if curve.decimals > MAX_DECIMALS {
                    return Err(TelemetryError::InvalidConfig(format!(
                        "{} decimals must be at most {}, got {}",
                        metric, MAX_DECIMALS, curve.decimals
                    )));
                }
            }
        }
        Ok(())
    }

    /// History spacing as a duration.
    pub fn sample_interval(&self) -> Result<Duration> {
        Duration::try_seconds(self.sample_interval_secs).ok_or_else(|| {
            TelemetryError::InvalidConfig(format!(
                "sample_interval_secs out of range: {}",
                self.sample_interval_secs
            ))
        })
    }
}

/// Synthetic reading generator.
#[derive(Debug)]
pub struct SampleGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    clock: Box<dyn Clock>,
}

impl SampleGenerator {
    /// Create a generator on the system clock.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a generator on a custom clock.
    pub fn with_clock(config: GeneratorConfig, clock: impl Clock + 'static) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            clock: Box::new(clock),
        })
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Current instant according to the generator's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// One live reading stamped with the current instant.
    pub fn generate_current(&mut self) -> Reading {
        let now = self.clock.now();
        let id = format!("current-{}", now.timestamp_millis());
        sample(&self.config.live, &mut self.rng, id, 0, now)
    }

    /// `hours + 1` readings spaced one interval apart, oldest first,
    /// the last one stamped with the current instant.
    ///
    /// Fails with [`TelemetryError::TimestampOutOfRange`] when the oldest
    /// timestamp cannot be represented.
    pub fn generate_history(&mut self, hours: usize) -> Result<Vec<Reading>> {
        let now = self.clock.now();
        let step = self.config.sample_interval()?;
        let mut readings = Vec::with_capacity(hours.saturating_add(1).min(MAX_PREALLOC));

        // Oldest first, so an unrepresentable span fails before any sampling
        for offset in (0..=hours).rev() {
            let timestamp = timestamp_before(now, step, offset)?;
            let id = format!("data-{}", offset);
            readings.push(sample(&self.config.historical, &mut self.rng, id, offset, timestamp));
        }

        Ok(readings)
    }

    /// One reading on the history curves at hour offset `offset`, stamped `timestamp`.
    pub fn generate_at(&mut self, offset: usize, timestamp: DateTime<Utc>) -> Reading {
        let id = format!("data-{}", offset);
        sample(&self.config.historical, &mut self.rng, id, offset, timestamp)
    }
}

/// Upper bound on the history buffer reserved up front.
const MAX_PREALLOC: usize = 1 << 16;

/// `now - step * offset`, or an error when the span leaves chrono's range.
fn timestamp_before(now: DateTime<Utc>, step: Duration, offset: usize) -> Result<DateTime<Utc>> {
    i32::try_from(offset)
        .ok()
        .and_then(|n| step.checked_mul(n))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(TelemetryError::TimestampOutOfRange { offset })
}

fn sample(
    profile: &GenerationProfile,
    rng: &mut StdRng,
    id: String,
    offset: usize,
    timestamp: DateTime<Utc>,
) -> Reading {
    let i = offset as f64;
    Reading {
        id,
        timestamp,
        temperature: profile.temperature.evaluate(i, rng),
        humidity: profile.humidity.evaluate(i, rng),
        pressure: profile.pressure.evaluate(i, rng),
        uv_index: profile.uv_index.evaluate(i, rng),
        wind_speed: profile.wind_speed.evaluate(i, rng),
        wind_direction: profile.wind_direction.evaluate(i, rng),
        precipitation: profile.precipitation.evaluate(i, rng),
        light_level: profile.light_level.evaluate(i, rng),
    }
}
