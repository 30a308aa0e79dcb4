// AgroClima Monitor - Prometheus metrics definitions
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Prometheus metrics for the station.
//!
//! Gauges mirror the latest live reading, its trends, the window summary
//! and the active alert tally.

use agroclima::{DaySummary, Severity, SeverityCounts, Trend, Update};
use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_gauge, register_gauge_vec, Counter, Encoder, Gauge, GaugeVec,
    TextEncoder,
};

lazy_static! {
    // ============================================================
    // Live reading
    // ============================================================

    /// Latest value per metric (labeled by wire name).
    pub static ref READING_VALUE: GaugeVec = register_gauge_vec!(
        "agroclima_reading_value",
        "Latest live reading per metric",
        &["metric"]
    ).unwrap();

    /// Trend per metric against the previous live reading.
    /// Values: 1 = up, 0 = flat, -1 = down
    pub static ref READING_TREND: GaugeVec = register_gauge_vec!(
        "agroclima_reading_trend",
        "Trend of the latest reading (1=up, 0=flat, -1=down)",
        &["metric"]
    ).unwrap();

    /// Live refreshes since start.
    pub static ref REFRESHES_TOTAL: Counter = register_counter!(
        "agroclima_refreshes_total",
        "Total live refreshes"
    ).unwrap();

    // ============================================================
    // Window
    // ============================================================

    pub static ref WINDOW_READINGS: Gauge = register_gauge!(
        "agroclima_window_readings",
        "Readings held in the rolling history window"
    ).unwrap();

    /// Day panel figures (labeled by field).
    pub static ref DAY_SUMMARY: GaugeVec = register_gauge_vec!(
        "agroclima_day_summary",
        "Aggregates over the rolling window",
        &["field"]
    ).unwrap();

    // ============================================================
    // Alerts and connectivity
    // ============================================================

    pub static ref ACTIVE_ALERTS: GaugeVec = register_gauge_vec!(
        "agroclima_active_alerts",
        "Active alerts per severity",
        &["severity"]
    ).unwrap();

    pub static ref STATION_CONNECTED: Gauge = register_gauge!(
        "agroclima_station_connected",
        "Simulated station connectivity (1=connected, 0=offline)"
    ).unwrap();
}

/// Numeric encoding of a trend.
pub fn trend_value(trend: Trend) -> f64 {
    match trend {
        Trend::Up => 1.0,
        Trend::Flat => 0.0,
        Trend::Down => -1.0,
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

/// Record one refresh.
pub fn record_update(update: &Update) {
    for indicator in &update.indicators {
        let name = indicator.metric.name();
        READING_VALUE.with_label_values(&[name]).set(indicator.value);
        READING_TREND
            .with_label_values(&[name])
            .set(trend_value(indicator.trend));
    }
    REFRESHES_TOTAL.inc();
}

/// Record window occupancy and its summary, if any.
pub fn record_window(len: usize, summary: Option<&DaySummary>) {
    WINDOW_READINGS.set(len as f64);
    if let Some(summary) = summary {
        DAY_SUMMARY
            .with_label_values(&["maxTemperature"])
            .set(summary.max_temperature);
        DAY_SUMMARY
            .with_label_values(&["minTemperature"])
            .set(summary.min_temperature);
        DAY_SUMMARY
            .with_label_values(&["meanHumidity"])
            .set(summary.mean_humidity);
        DAY_SUMMARY
            .with_label_values(&["maxUvIndex"])
            .set(summary.max_uv_index);
    }
}

/// Record the active alert tally.
pub fn record_alerts(counts: &SeverityCounts) {
    for severity in Severity::DESCENDING {
        ACTIVE_ALERTS
            .with_label_values(&[severity_label(severity)])
            .set(counts.get(severity) as f64);
    }
}

pub fn record_connectivity(connected: bool) {
    STATION_CONNECTED.set(if connected { 1.0 } else { 0.0 });
}

/// Serializes tests that read or write the process-wide registry.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Encode all metrics to Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agroclima::{EngineConfig, GeneratorConfig, TelemetryEngine};

    #[test]
    fn test_trend_value() {
        assert_eq!(trend_value(Trend::Up), 1.0);
        assert_eq!(trend_value(Trend::Flat), 0.0);
        assert_eq!(trend_value(Trend::Down), -1.0);
    }

    #[test]
    fn test_record_update_sets_gauges() {
        let _guard = test_guard();
        let config = EngineConfig::new().with_generator(GeneratorConfig::new().with_seed(3));
        let mut engine = TelemetryEngine::new(config).unwrap();
        let update = engine.tick();

        record_update(&update);
        let value = READING_VALUE.with_label_values(&["temperature"]).get();
        assert_eq!(value, update.reading.temperature);
        assert!(REFRESHES_TOTAL.get() >= 1.0);
    }

    #[test]
    fn test_record_alerts() {
        let _guard = test_guard();
        let counts = SeverityCounts {
            high: 2,
            medium: 0,
            low: 1,
        };
        record_alerts(&counts);
        assert_eq!(ACTIVE_ALERTS.with_label_values(&["high"]).get(), 2.0);
        assert_eq!(ACTIVE_ALERTS.with_label_values(&["low"]).get(), 1.0);
    }

    #[test]
    fn test_encode_metrics() {
        let _guard = test_guard();
        record_connectivity(true);
        record_window(24, None);
        let output = encode_metrics();
        assert!(output.contains("agroclima_station_connected"));
        assert!(output.contains("agroclima_window_readings"));
    }
}
