// AgroClima Monitor - Refresh scheduler and HTTP surface
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Error types for the monitor.

use agroclima::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for monitor operations
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] TelemetryError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
