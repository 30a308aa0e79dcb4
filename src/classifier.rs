// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Reading classification module
//!
//! Maps scalar readings to display categories: a trend against the
//! previous reading, a bucket from an ascending threshold ladder, and the
//! tone a tile should be drawn with. Every function here is total.

use crate::error::{Result, TelemetryError};
use crate::reading::{Metric, Reading};
use serde::{Deserialize, Serialize};

// ============================================================================
// Trend
// ============================================================================

/// Direction of change against the previous reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Arrow glyph used on tiles.
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Flat => "→",
        }
    }
}

/// Compare a reading against its predecessor.
///
/// A missing predecessor is `Flat`. A predecessor of exactly zero is a
/// real value and is compared normally.
pub fn trend_of(current: f64, previous: Option<f64>) -> Trend {
    match previous {
        Some(prev) if current > prev => Trend::Up,
        Some(prev) if current < prev => Trend::Down,
        _ => Trend::Flat,
    }
}

// ============================================================================
// Threshold ladders
// ============================================================================

/// Pick the bucket for `value` from an ascending threshold list.
///
/// `buckets[k]` is returned for the first `k` with `value < thresholds[k]`,
/// and the last bucket when no threshold is above `value`. Each threshold
/// is therefore the inclusive lower bound of the bucket after it. NaN
/// falls through to the last bucket.
///
/// # Panics
///
/// Panics if `buckets` holds fewer than `thresholds.len() + 1` entries and
/// `value` falls past the end of it. Use [`Ladder`] for ladders built at
/// runtime; it checks the counts once up front.
pub fn bucketize<B: Copy>(value: f64, thresholds: &[f64], buckets: &[B]) -> B {
    let index = thresholds
        .iter()
        .position(|&bound| value < bound)
        .unwrap_or(thresholds.len());
    buckets[index]
}

/// Validated threshold ladder for runtime-configured metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ladder<B> {
    thresholds: Vec<f64>,
    buckets: Vec<B>,
}

impl<B: Copy> Ladder<B> {
    /// Build a ladder. Thresholds must be finite and strictly ascending,
    /// with exactly one more bucket than thresholds.
    pub fn new(thresholds: Vec<f64>, buckets: Vec<B>) -> Result<Self> {
        if buckets.len() != thresholds.len() + 1 {
            return Err(TelemetryError::InvalidLadder(format!(
                "{} thresholds need {} buckets, got {}",
                thresholds.len(),
                thresholds.len() + 1,
                buckets.len()
            )));
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(TelemetryError::InvalidLadder(
                "thresholds must be finite".to_string(),
            ));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TelemetryError::InvalidLadder(
                "thresholds must be strictly ascending".to_string(),
            ));
        }
        Ok(Self {
            thresholds,
            buckets,
        })
    }

    /// Bucket for a value.
    pub fn classify(&self, value: f64) -> B {
        bucketize(value, &self.thresholds, &self.buckets)
    }

    /// Threshold list.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

// ============================================================================
// Display tones
// ============================================================================

/// Visual treatment of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Cool blue.
    Sky,
    /// Natural green.
    Leaf,
    /// Sun gold.
    Gold,
    /// Dry earth.
    Earth,
}

// ============================================================================
// Per-metric buckets
// ============================================================================

/// Temperature bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBucket {
    Cold,
    Mild,
    Warm,
    Hot,
}

/// Upper bounds (°C) of cold, mild and warm.
pub const TEMPERATURE_THRESHOLDS: [f64; 3] = [15.0, 25.0, 32.0];

impl TemperatureBucket {
    const LADDER: [TemperatureBucket; 4] = [
        TemperatureBucket::Cold,
        TemperatureBucket::Mild,
        TemperatureBucket::Warm,
        TemperatureBucket::Hot,
    ];

    pub fn tone(self) -> Tone {
        match self {
            TemperatureBucket::Cold => Tone::Sky,
            TemperatureBucket::Mild => Tone::Leaf,
            TemperatureBucket::Warm => Tone::Gold,
            TemperatureBucket::Hot => Tone::Earth,
        }
    }
}

/// Classify a temperature in °C.
pub fn temperature_bucket(temp: f64) -> TemperatureBucket {
    bucketize(temp, &TEMPERATURE_THRESHOLDS, &TemperatureBucket::LADDER)
}

/// Humidity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumidityBucket {
    Dry,
    Low,
    Ideal,
    Saturated,
}

/// Upper bounds (%) of dry, low and ideal.
pub const HUMIDITY_THRESHOLDS: [f64; 3] = [30.0, 50.0, 70.0];

impl HumidityBucket {
    const LADDER: [HumidityBucket; 4] = [
        HumidityBucket::Dry,
        HumidityBucket::Low,
        HumidityBucket::Ideal,
        HumidityBucket::Saturated,
    ];

    pub fn tone(self) -> Tone {
        match self {
            HumidityBucket::Dry => Tone::Earth,
            HumidityBucket::Low => Tone::Gold,
            HumidityBucket::Ideal => Tone::Leaf,
            HumidityBucket::Saturated => Tone::Sky,
        }
    }
}

/// Classify a relative humidity in %.
pub fn humidity_bucket(humidity: f64) -> HumidityBucket {
    bucketize(humidity, &HUMIDITY_THRESHOLDS, &HumidityBucket::LADDER)
}

/// UV exposure bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UvBucket {
    Low,
    Moderate,
    High,
    Extreme,
}

/// Upper bounds of low, moderate and high UV.
pub const UV_THRESHOLDS: [f64; 3] = [3.0, 6.0, 8.0];

impl UvBucket {
    const LADDER: [UvBucket; 4] = [
        UvBucket::Low,
        UvBucket::Moderate,
        UvBucket::High,
        UvBucket::Extreme,
    ];

    /// Moderate and high are drawn the same.
    pub fn tone(self) -> Tone {
        match self {
            UvBucket::Low => Tone::Leaf,
            UvBucket::Moderate | UvBucket::High => Tone::Gold,
            UvBucket::Extreme => Tone::Earth,
        }
    }
}

/// Classify a UV index.
pub fn uv_bucket(uv: f64) -> UvBucket {
    bucketize(uv, &UV_THRESHOLDS, &UvBucket::LADDER)
}

/// Chance-of-rain bucket for forecast days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationChance {
    Low,
    Medium,
    High,
}

/// Upper bounds (%) of low and medium chance.
pub const PRECIPITATION_CHANCE_THRESHOLDS: [f64; 2] = [20.0, 50.0];

/// Classify a precipitation probability in %.
pub fn precipitation_chance(probability: f64) -> PrecipitationChance {
    bucketize(
        probability,
        &PRECIPITATION_CHANCE_THRESHOLDS,
        &[
            PrecipitationChance::Low,
            PrecipitationChance::Medium,
            PrecipitationChance::High,
        ],
    )
}

/// Five-step temperature band used for the station marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Freezing,
    Cool,
    Mild,
    Warm,
    Hot,
}

/// Upper bounds (°C) of the first four map bands.
pub const TEMPERATURE_BAND_THRESHOLDS: [f64; 4] = [10.0, 20.0, 30.0, 35.0];

impl TemperatureBand {
    /// Marker color.
    pub fn color(self) -> &'static str {
        match self {
            TemperatureBand::Freezing => "#3B82F6",
            TemperatureBand::Cool => "#10B981",
            TemperatureBand::Mild => "#F59E0B",
            TemperatureBand::Warm => "#F97316",
            TemperatureBand::Hot => "#EF4444",
        }
    }
}

/// Classify a temperature into a map band.
pub fn temperature_band(temp: f64) -> TemperatureBand {
    bucketize(
        temp,
        &TEMPERATURE_BAND_THRESHOLDS,
        &[
            TemperatureBand::Freezing,
            TemperatureBand::Cool,
            TemperatureBand::Mild,
            TemperatureBand::Warm,
            TemperatureBand::Hot,
        ],
    )
}

// ============================================================================
// Alert severity
// ============================================================================

/// Alert urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities, most urgent first.
    pub const DESCENDING: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Ordinal for sorting and tallying (low = 0).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
        }
    }

    /// Banner label.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "INFORMATION",
            Severity::Medium => "WARNING",
            Severity::High => "CRITICAL",
        }
    }
}

/// Ordinal of a severity.
pub fn severity_rank(severity: Severity) -> u8 {
    severity.rank()
}

// ============================================================================
// Tile indicators
// ============================================================================

/// Display attributes of one metric tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub metric: Metric,
    pub value: f64,
    pub unit: String,
    pub trend: Trend,
    pub tone: Tone,
}

/// Tone a metric's tile is drawn with for a given value.
pub fn tone_for(metric: Metric, value: f64) -> Tone {
    match metric {
        Metric::Temperature => temperature_bucket(value).tone(),
        Metric::Humidity => humidity_bucket(value).tone(),
        Metric::UvIndex => uv_bucket(value).tone(),
        Metric::Pressure | Metric::Precipitation => Tone::Sky,
        Metric::WindSpeed | Metric::WindDirection => Tone::Leaf,
        Metric::LightLevel => Tone::Gold,
    }
}

/// Tile attributes for every metric of `current`, trended against `previous`.
pub fn indicators(current: &Reading, previous: Option<&Reading>) -> Vec<Indicator> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = metric.value_of(current);
            Indicator {
                metric,
                value,
                unit: metric.unit().to_string(),
                trend: trend_of(value, previous.map(|p| metric.value_of(p))),
                tone: tone_for(metric, value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend() {
        assert_eq!(trend_of(5.0, Some(3.0)), Trend::Up);
        assert_eq!(trend_of(3.0, Some(5.0)), Trend::Down);
        assert_eq!(trend_of(4.0, Some(4.0)), Trend::Flat);
        assert_eq!(trend_of(4.0, None), Trend::Flat);
    }

    #[test]
    fn test_trend_against_zero() {
        assert_eq!(trend_of(1.0, Some(0.0)), Trend::Up);
        assert_eq!(trend_of(-1.0, Some(0.0)), Trend::Down);
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(temperature_bucket(14.9), TemperatureBucket::Cold);
        assert_eq!(temperature_bucket(15.0), TemperatureBucket::Mild);
        assert_eq!(temperature_bucket(24.999), TemperatureBucket::Mild);
        assert_eq!(temperature_bucket(25.0), TemperatureBucket::Warm);
        assert_eq!(temperature_bucket(31.9), TemperatureBucket::Warm);
        assert_eq!(temperature_bucket(32.0), TemperatureBucket::Hot);
        assert_eq!(temperature_bucket(-40.0), TemperatureBucket::Cold);
    }

    #[test]
    fn test_humidity_boundaries() {
        assert_eq!(humidity_bucket(29.9), HumidityBucket::Dry);
        assert_eq!(humidity_bucket(30.0), HumidityBucket::Low);
        assert_eq!(humidity_bucket(50.0), HumidityBucket::Ideal);
        assert_eq!(humidity_bucket(70.0), HumidityBucket::Saturated);
        // Overshoot past 100 still classifies
        assert_eq!(humidity_bucket(104.2), HumidityBucket::Saturated);
    }

    #[test]
    fn test_uv_boundaries_and_tones() {
        assert_eq!(uv_bucket(2.9), UvBucket::Low);
        assert_eq!(uv_bucket(3.0), UvBucket::Moderate);
        assert_eq!(uv_bucket(6.0), UvBucket::High);
        assert_eq!(uv_bucket(8.0), UvBucket::Extreme);
        assert_eq!(UvBucket::Moderate.tone(), UvBucket::High.tone());
        assert_ne!(UvBucket::Low.tone(), UvBucket::Extreme.tone());
    }

    #[test]
    fn test_precipitation_chance() {
        assert_eq!(precipitation_chance(0.0), PrecipitationChance::Low);
        assert_eq!(precipitation_chance(20.0), PrecipitationChance::Medium);
        assert_eq!(precipitation_chance(60.0), PrecipitationChance::High);
    }

    #[test]
    fn test_temperature_band() {
        assert_eq!(temperature_band(9.9), TemperatureBand::Freezing);
        assert_eq!(temperature_band(22.0), TemperatureBand::Mild);
        assert_eq!(temperature_band(35.0), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::Hot.color(), "#EF4444");
    }

    #[test]
    fn test_nan_falls_to_last_bucket() {
        assert_eq!(temperature_bucket(f64::NAN), TemperatureBucket::Hot);
    }

    #[test]
    #[should_panic]
    fn test_bucketize_short_bucket_list_panics() {
        bucketize(10.0, &[1.0, 2.0], &['a', 'b']);
    }

    #[test]
    fn test_ladder_validation() {
        assert!(Ladder::new(vec![1.0, 2.0], vec!['a', 'b', 'c']).is_ok());
        assert!(matches!(
            Ladder::new(vec![1.0, 2.0], vec!['a', 'b']),
            Err(TelemetryError::InvalidLadder(_))
        ));
        assert!(Ladder::new(vec![2.0, 1.0], vec!['a', 'b', 'c']).is_err());
        assert!(Ladder::new(vec![1.0, 1.0], vec!['a', 'b', 'c']).is_err());
        assert!(Ladder::new(vec![f64::NAN], vec!['a', 'b']).is_err());
    }

    #[test]
    fn test_ladder_matches_builtin() {
        let ladder = Ladder::new(
            TEMPERATURE_THRESHOLDS.to_vec(),
            TemperatureBucket::LADDER.to_vec(),
        )
        .unwrap();
        for t in [-5.0, 14.9, 15.0, 24.0, 25.0, 31.99, 32.0, 45.0] {
            assert_eq!(ladder.classify(t), temperature_bucket(t));
        }
    }

    #[test]
    fn test_severity_rank() {
        assert!(severity_rank(Severity::High) > severity_rank(Severity::Medium));
        assert!(severity_rank(Severity::Medium) > severity_rank(Severity::Low));
        assert!(Severity::High > Severity::Low);
        assert_eq!(Severity::High.label(), "CRITICAL");
    }

    #[test]
    fn test_tone_for_fixed_metrics() {
        assert_eq!(tone_for(Metric::Pressure, 990.0), Tone::Sky);
        assert_eq!(tone_for(Metric::WindSpeed, 30.0), Tone::Leaf);
        assert_eq!(tone_for(Metric::LightLevel, 0.0), Tone::Gold);
        assert_eq!(tone_for(Metric::Temperature, 33.0), Tone::Earth);
        assert_eq!(tone_for(Metric::Humidity, 20.0), Tone::Earth);
    }
}
