// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Base curves for synthetic station readings.
//!
//! Every metric follows the same recipe: a sinusoid evaluated at an hour
//! offset, a uniform noise band on top, an optional lower clamp, then
//! rounding to a fixed number of decimals.

use crate::reading::Metric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Curve definition for a single metric.
///
/// `value = round(max(floor, center + amplitude * sin(frequency * i) + U(-noise, noise)))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Center of the sinusoid.
    pub center: f64,
    /// Sinusoid amplitude.
    pub amplitude: f64,
    /// Angular step per hour of offset.
    pub frequency: f64,
    /// Half-width of the uniform noise band.
    pub noise: f64,
    /// Lower clamp. `None` leaves the value unclamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    /// Decimal places kept after rounding.
    pub decimals: u32,
}

impl CurveSpec {
    /// Sinusoidal curve with one decimal and no clamp.
    pub const fn sine(center: f64, amplitude: f64, frequency: f64, noise: f64) -> Self {
        Self {
            center,
            amplitude,
            frequency,
            noise,
            floor: None,
            decimals: 1,
        }
    }

    /// Flat curve: center plus noise only.
    pub const fn flat(center: f64, noise: f64) -> Self {
        Self::sine(center, 0.0, 0.0, noise)
    }

    /// Clamp values below `floor`.
    pub const fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Keep `decimals` decimal places.
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Noise-free base value at hour offset `offset`.
    pub fn base(&self, offset: f64) -> f64 {
        self.center + self.amplitude * (self.frequency * offset).sin()
    }

    /// Evaluate the curve at hour offset `offset`.
    pub fn evaluate(&self, offset: f64, rng: &mut impl Rng) -> f64 {
        let noise = if self.noise > 0.0 {
            rng.gen_range(-self.noise..=self.noise)
        } else {
            0.0
        };
        let raw = self.base(offset) + noise;
        let clamped = match self.floor {
            Some(floor) => raw.max(floor),
            None => raw,
        };
        round_dp(clamped, self.decimals)
    }
}

/// Round to `decimals` decimal places.
/// Most decimal places an f64 reading can meaningfully keep.
pub const MAX_DECIMALS: u32 = 15;

pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    let rounded = (value * scale).round() / scale;
    // Avoid handing out -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// One curve per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProfile {
    pub temperature: CurveSpec,
    pub humidity: CurveSpec,
    pub pressure: CurveSpec,
    pub uv_index: CurveSpec,
    pub wind_speed: CurveSpec,
    pub wind_direction: CurveSpec,
    pub precipitation: CurveSpec,
    pub light_level: CurveSpec,
}

impl GenerationProfile {
    /// Curves used for the backward-looking hourly history.
    pub fn historical() -> Self {
        Self {
            temperature: CurveSpec::sine(20.0, 8.0, 0.2, 2.0),
            humidity: CurveSpec::sine(60.0, 20.0, 0.15, 5.0),
            pressure: CurveSpec::sine(1013.0, 10.0, 0.1, 2.5),
            uv_index: CurveSpec::sine(5.0, 3.0, 0.3, 1.0).with_floor(0.0),
            wind_speed: CurveSpec::sine(10.0, 5.0, 0.25, 1.5).with_floor(0.0),
            wind_direction: CurveSpec::flat(180.0, 180.0).with_decimals(0),
            precipitation: CurveSpec::flat(1.0, 1.0).with_floor(0.0),
            light_level: CurveSpec::sine(500.0, 300.0, 0.2, 50.0).with_floor(0.0),
        }
    }

    /// Curves used for the live "now" reading.
    pub fn live() -> Self {
        Self {
            temperature: CurveSpec::flat(22.0, 2.0),
            humidity: CurveSpec::flat(65.0, 5.0),
            pressure: CurveSpec::flat(1015.0, 4.0),
            uv_index: CurveSpec::flat(6.0, 1.0).with_floor(0.0),
            wind_speed: CurveSpec::flat(12.0, 3.0).with_floor(0.0),
            wind_direction: CurveSpec::flat(180.0, 180.0).with_decimals(0),
            precipitation: CurveSpec::flat(0.5, 0.5).with_floor(0.0),
            light_level: CurveSpec::flat(600.0, 100.0).with_floor(0.0),
        }
    }

    /// Same curves with every noise band removed.
    pub fn noiseless(mut self) -> Self {
        for metric in Metric::ALL {
            self.curve_mut(metric).noise = 0.0;
        }
        self
    }

    /// Curve for a metric.
    pub fn curve(&self, metric: Metric) -> &CurveSpec {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Pressure => &self.pressure,
            Metric::UvIndex => &self.uv_index,
            Metric::WindSpeed => &self.wind_speed,
            Metric::WindDirection => &self.wind_direction,
            Metric::Precipitation => &self.precipitation,
            Metric::LightLevel => &self.light_level,
        }
    }

    /// Mutable curve for a metric.
    pub fn curve_mut(&mut self, metric: Metric) -> &mut CurveSpec {
        match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Humidity => &mut self.humidity,
            Metric::Pressure => &mut self.pressure,
            Metric::UvIndex => &mut self.uv_index,
            Metric::WindSpeed => &mut self.wind_speed,
            Metric::WindDirection => &mut self.wind_direction,
            Metric::Precipitation => &mut self.precipitation,
            Metric::LightLevel => &mut self.light_level,
        }
    }
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self::historical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(21.449, 1), 21.4);
        assert_eq!(round_dp(21.46, 1), 21.5);
        assert_eq!(round_dp(359.6, 0), 360.0);
        assert_eq!(round_dp(-0.04, 1), 0.0);
        assert!(round_dp(-0.04, 1).is_sign_positive());
    }

    #[test]
    fn test_round_dp_oversized_decimals() {
        assert_eq!(round_dp(1.25, u32::MAX), 1.25);
        assert_eq!(round_dp(1.25, MAX_DECIMALS + 1), round_dp(1.25, MAX_DECIMALS));
    }

    #[test]
    fn test_noiseless_curve_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let curve = CurveSpec::sine(20.0, 8.0, 0.2, 0.0);

        assert_eq!(curve.evaluate(0.0, &mut rng), 20.0);
        // 20 + 8 * sin(1.0) = 26.7318...
        assert_eq!(curve.evaluate(5.0, &mut rng), 26.7);
        assert_relative_eq!(curve.base(5.0), 26.731767878, epsilon = 1e-6);
    }

    #[test]
    fn test_noise_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let curve = CurveSpec::flat(10.0, 1.5).with_decimals(3);
        for _ in 0..1000 {
            let v = curve.evaluate(0.0, &mut rng);
            assert!((8.5..=11.5).contains(&v), "out of band: {}", v);
        }
    }

    #[test]
    fn test_floor_clamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let curve = CurveSpec::flat(-5.0, 1.0).with_floor(0.0);
        for _ in 0..100 {
            assert_eq!(curve.evaluate(3.0, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_historical_constants() {
        let p = GenerationProfile::historical();
        assert_eq!(p.temperature.center, 20.0);
        assert_eq!(p.temperature.amplitude, 8.0);
        assert_eq!(p.pressure.noise, 2.5);
        assert_eq!(p.wind_direction.decimals, 0);
        // Humidity and pressure keep their overshoot
        assert_eq!(p.humidity.floor, None);
        assert_eq!(p.pressure.floor, None);
        assert_eq!(p.light_level.floor, Some(0.0));
    }

    #[test]
    fn test_noiseless_profile() {
        let p = GenerationProfile::live().noiseless();
        for metric in Metric::ALL {
            assert_eq!(p.curve(metric).noise, 0.0);
        }
        assert_eq!(p.temperature.center, 22.0);
    }
}
