// AgroClima Monitor - Refresh scheduler and HTTP surface
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! # AgroClima Monitor
//!
//! Runs the telemetry engine on a refresh schedule and serves the
//! dashboard view, history and Prometheus metrics over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Serve on the default port with a live refresh every 5 seconds
//! agroclima-monitor
//!
//! # Reproducible run from a config file, faster refresh
//! agroclima-monitor --config station.json --seed 42 --interval-ms 1000
//!
//! # Write a week of hourly history to CSV and exit
//! agroclima-monitor --export week.csv --hours 168
//! ```

mod config;
mod error;
mod export;
mod metrics;
mod scheduler;

use agroclima::{Reading, SampleGenerator, TelemetryEngine};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use config::MonitorConfig;
use error::{MonitorError, Result};
use metrics::encode_metrics;
use scheduler::{Scheduler, SharedState};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// AgroClima station monitor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Live refresh period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Connectivity update period in milliseconds
    #[arg(long)]
    connectivity_interval_ms: Option<u64>,

    /// Readings kept in the rolling window
    #[arg(long)]
    capacity: Option<usize>,

    /// Seed for reproducible readings
    #[arg(long)]
    seed: Option<u64>,

    /// Write generated history to this CSV file and exit
    #[arg(long)]
    export: Option<PathBuf>,

    /// Hours of history to export
    #[arg(long, default_value = "24")]
    hours: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// File configuration with command-line overrides applied.
    fn resolve(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::from_json(path)?,
            None => MonitorConfig::default(),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ms) = self.interval_ms {
            config.refresh_interval_ms = ms;
        }
        if let Some(ms) = self.connectivity_interval_ms {
            config.connectivity_interval_ms = ms;
        }
        if let Some(capacity) = self.capacity {
            config.engine.history_capacity = capacity;
        }
        if let Some(seed) = self.seed {
            config.engine.generator.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Application state shared across handlers.
struct AppState {
    shared: Arc<SharedState>,
    start_time: std::time::Instant,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("AgroClima Monitor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.resolve()?;

    if let Some(path) = &args.export {
        let mut generator = SampleGenerator::new(config.engine.generator.clone())?;
        export::export_history(&mut generator, args.hours, path)?;
        return Ok(());
    }

    let engine = TelemetryEngine::new(config.engine.clone())?;
    info!(
        "Station {} ({}) with {} readings of history",
        engine.station().id,
        engine.station().name,
        engine.history().len()
    );

    let shared = Arc::new(SharedState::new(engine));
    let (stop, tasks) = Scheduler::new(Arc::clone(&shared), &config).start().await;

    let state = Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    });

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on http://{}", addr);
    info!("Metrics endpoint: http://{}/metrics", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    stop.stop();
    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!("scheduler task failed: {}", e);
        }
    }
    info!("Shut down cleanly");
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/history", get(history_handler))
        .route("/alerts/:id/dismiss", post(dismiss_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Root handler - shows a simple HTML page.
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>AgroClima Monitor</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        h1 { color: #2d5016; }
        a { color: #4a7c23; text-decoration: none; }
        .endpoints { background: #f5f9f0; padding: 20px; border-radius: 8px; margin: 20px 0; }
        .endpoint { margin: 10px 0; }
        code { background: #e9ecef; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>AgroClima Monitor</h1>
    <p>Synthetic weather-station telemetry.</p>

    <div class="endpoints">
        <h2>Endpoints</h2>
        <div class="endpoint"><a href="/dashboard">/dashboard</a> - Current reading, tiles, alerts and forecast (JSON)</div>
        <div class="endpoint"><a href="/history">/history</a> - Rolling window, oldest first (JSON)</div>
        <div class="endpoint"><a href="/metrics">/metrics</a> - Prometheus metrics</div>
        <div class="endpoint"><a href="/health">/health</a> - Health check</div>
        <div class="endpoint"><a href="/status">/status</a> - Status information (JSON)</div>
        <div class="endpoint"><code>POST /alerts/{id}/dismiss</code> - Dismiss an alert</div>
    </div>
</body>
</html>"#,
    )
}

/// Metrics handler - returns Prometheus text format.
async fn metrics_handler() -> impl IntoResponse {
    let metrics = encode_metrics();
    (
        StatusCode::OK,
        [("Content-Type", "text/plain; charset=utf-8")],
        metrics,
    )
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Status information response.
#[derive(Serialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    connected: bool,
    refreshes: u64,
    window_readings: usize,
    window_capacity: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let engine = state.shared.engine.read().await;
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        connected: state.shared.is_connected(),
        refreshes: state.shared.refresh_count(),
        window_readings: engine.history().len(),
        window_capacity: engine.history().capacity(),
    })
}

/// Dashboard view, serialized under the read lock.
async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<serde_json::Value>, MonitorError> {
    let engine = state.shared.engine.read().await;
    let mut view = serde_json::to_value(engine.dashboard())?;
    view["connected"] = serde_json::Value::Bool(state.shared.is_connected());
    Ok(Json(view))
}

async fn history_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Reading>> {
    Json(state.shared.engine.read().await.snapshot())
}

#[derive(Serialize)]
struct DismissResponse {
    id: String,
    dismissed: bool,
}

/// Dismiss an alert. Unknown ids are a no-op and report `dismissed: false`.
async fn dismiss_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<DismissResponse> {
    let mut engine = state.shared.engine.write().await;
    let dismissed = engine.dismiss_alert(&id);
    metrics::record_alerts(&engine.alerts().counts());
    drop(engine);

    if dismissed {
        info!("alert {} dismissed", id);
    }
    Json(DismissResponse { id, dismissed })
}

#[cfg(test)]
#[allow(clippy::await_holding_lock)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["agroclima-monitor"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let config = args(&["--port", "8080", "--interval-ms", "250", "--seed", "7"])
            .resolve()
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.refresh_interval_ms, 250);
        assert_eq!(config.engine.generator.seed, Some(7));
        assert_eq!(config.connectivity_interval_ms, 30_000);
    }

    #[test]
    fn test_cli_overrides_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "port": 9000, "refresh_interval_ms": 2000 }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = args(&["--config", &path, "--port", "9500"]).resolve().unwrap();
        assert_eq!(config.port, 9500);
        assert_eq!(config.refresh_interval_ms, 2000);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = args(&["--interval-ms", "0"]).resolve();
        assert!(matches!(result, Err(MonitorError::InvalidConfig(_))));
    }

    fn app_state() -> Arc<AppState> {
        let engine = TelemetryEngine::new(Default::default()).unwrap();
        Arc::new(AppState {
            shared: Arc::new(SharedState::new(engine)),
            start_time: std::time::Instant::now(),
        })
    }

    #[tokio::test]
    async fn test_dismiss_handler() {
        let _guard = metrics::test_guard();
        let state = app_state();

        let Json(body) =
            dismiss_handler(State(Arc::clone(&state)), Path("alert-1".to_string())).await;
        assert!(body.dismissed);
        assert_eq!(body.id, "alert-1");

        let engine = state.shared.engine.read().await;
        assert_eq!(engine.alerts().counts().total(), 2);
    }

    #[tokio::test]
    async fn test_dismiss_unknown_id_is_a_no_op() {
        let _guard = metrics::test_guard();
        let state = app_state();

        let response = dismiss_handler(State(Arc::clone(&state)), Path("missing".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let Json(body) =
            dismiss_handler(State(Arc::clone(&state)), Path("missing".to_string())).await;
        assert!(!body.dismissed);

        let engine = state.shared.engine.read().await;
        assert_eq!(engine.alerts().counts().total(), 3);
    }

    #[tokio::test]
    async fn test_dismiss_updates_alert_gauges() {
        let _guard = metrics::test_guard();
        metrics::record_alerts(&agroclima::SeverityCounts {
            high: 9,
            medium: 9,
            low: 9,
        });
        let state = app_state();

        dismiss_handler(State(Arc::clone(&state)), Path("alert-1".to_string())).await;

        let gauge = |label: &str| metrics::ACTIVE_ALERTS.with_label_values(&[label]).get();
        assert_eq!(gauge("high"), 1.0);
        assert_eq!(gauge("medium"), 0.0);
        assert_eq!(gauge("low"), 1.0);
    }

    #[tokio::test]
    async fn test_dashboard_handler_reports_connectivity() {
        let state = app_state();

        let Json(view) = dashboard_handler(State(state)).await.unwrap();
        assert_eq!(view["connected"], true);
        assert_eq!(view["station"]["id"], "station-001");
    }
}
