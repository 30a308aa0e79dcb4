// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Station alerts.
//!
//! Alerts are never removed; dismissing one only clears its active flag.

use crate::classifier::Severity;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Temperature,
    Humidity,
    Pressure,
    Uv,
    Wind,
}

/// A station alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_active: bool,
}

impl Alert {
    /// Create an active alert.
    pub fn new(
        id: &str,
        kind: AlertKind,
        severity: Severity,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            severity,
            message: message.to_string(),
            timestamp,
            is_active: true,
        }
    }
}

/// Active alert tally per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    /// Count for one severity.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// The alert collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
}

impl AlertBoard {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    /// The three seed alerts shown when the station starts.
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self::new(vec![
            Alert::new(
                "alert-1",
                AlertKind::Temperature,
                Severity::Medium,
                "High temperature detected: 28.5°C",
                now - Duration::hours(2),
            ),
            Alert::new(
                "alert-2",
                AlertKind::Humidity,
                Severity::Low,
                "Humidity below average: 45%",
                now - Duration::hours(4),
            ),
            Alert::new(
                "alert-3",
                AlertKind::Uv,
                Severity::High,
                "Extreme UV index: 9.2",
                now - Duration::hours(1),
            ),
        ])
    }

    /// Mark an alert inactive. Unknown ids are ignored.
    ///
    /// Returns whether an alert with that id exists.
    pub fn dismiss(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if alert.is_active {
                    log::debug!("dismissed alert {}", id);
                }
                alert.is_active = false;
                true
            }
            None => false,
        }
    }

    /// Add an alert.
    pub fn raise(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Look up an alert by id.
    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Every alert, dismissed ones included, in insertion order.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    /// Active alerts, most severe first, newest first within a severity.
    pub fn active(&self) -> Vec<&Alert> {
        let mut active: Vec<&Alert> = self.alerts.iter().filter(|a| a.is_active).collect();
        active.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        active
    }

    /// Active alert tally per severity.
    pub fn counts(&self) -> SeverityCounts {
        self.alerts
            .iter()
            .filter(|a| a.is_active)
            .fold(SeverityCounts::default(), |mut counts, a| {
                match a.severity {
                    Severity::High => counts.high += 1,
                    Severity::Medium => counts.medium += 1,
                    Severity::Low => counts.low += 1,
                }
                counts
            })
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_dismiss_known_alert() {
        let mut board = AlertBoard::demo(now());
        let before = board.clone();

        assert!(board.dismiss("alert-1"));
        assert!(!board.get("alert-1").unwrap().is_active);
        assert_eq!(board.get("alert-2"), before.get("alert-2"));
        assert_eq!(board.get("alert-3"), before.get("alert-3"));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_dismiss_unknown_is_noop() {
        let mut board = AlertBoard::demo(now());
        let before = board.clone();
        assert!(!board.dismiss("nonexistent"));
        assert_eq!(board, before);
    }

    #[test]
    fn test_dismiss_twice() {
        let mut board = AlertBoard::demo(now());
        assert!(board.dismiss("alert-3"));
        let once = board.clone();
        assert!(board.dismiss("alert-3"));
        assert_eq!(board, once);
    }

    #[test]
    fn test_active_ordering() {
        let board = AlertBoard::demo(now());
        let ids: Vec<&str> = board.active().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["alert-3", "alert-1", "alert-2"]);
    }

    #[test]
    fn test_counts_only_active() {
        let mut board = AlertBoard::demo(now());
        assert_eq!(
            board.counts(),
            SeverityCounts {
                high: 1,
                medium: 1,
                low: 1
            }
        );

        board.dismiss("alert-3");
        let counts = board.counts();
        assert_eq!(counts.get(Severity::High), 0);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_alert_serde_shape() {
        let board = AlertBoard::demo(now());
        let json = serde_json::to_value(board.get("alert-3").unwrap()).unwrap();
        assert_eq!(json["type"], "uv");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_raise() {
        let mut board = AlertBoard::default();
        assert!(board.is_empty());
        board.raise(Alert::new(
            "alert-9",
            AlertKind::Wind,
            Severity::Medium,
            "Strong gusts: 48 km/h",
            now(),
        ));
        assert_eq!(board.active().len(), 1);
    }
}
