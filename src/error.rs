// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Error types for AgroClima
//!
//! Almost every operation in the engine is total. The variants below cover
//! the few places where a caller can hand us something unusable.

use crate::reading::Metric;
use thiserror::Error;

/// Result type alias for AgroClima operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Main error type for AgroClima operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    /// Aggregate queried before the window holds any reading
    #[error("Empty window: no readings to aggregate {metric}")]
    EmptyWindow { metric: Metric },

    /// History window capacity must be at least one reading
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Threshold ladder is malformed
    #[error("Invalid ladder: {0}")]
    InvalidLadder(String),

    /// History span reaches past the representable date range
    #[error("Timestamp out of range: {offset} intervals before now")]
    TimestampOutOfRange { offset: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
