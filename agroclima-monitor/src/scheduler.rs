// AgroClima Monitor - Refresh scheduler and HTTP surface
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Periodic refresh of the shared engine.
//!
//! Two independent loops run on the tokio runtime: one takes a live
//! reading every refresh period, the other updates the simulated
//! connectivity flag. Both stop when the [`StopHandle`] is triggered.

use crate::config::MonitorConfig;
use crate::metrics;
use agroclima::TelemetryEngine;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// State shared between the scheduler and the HTTP handlers.
#[derive(Debug)]
pub struct SharedState {
    /// The engine; every mutation goes through this one lock.
    pub engine: RwLock<TelemetryEngine>,
    /// Simulated station connectivity.
    pub connected: AtomicBool,
    /// Completed refreshes.
    pub refreshes: AtomicU64,
}

impl SharedState {
    pub fn new(engine: TelemetryEngine) -> Self {
        Self {
            engine: RwLock::new(engine),
            connected: AtomicBool::new(true),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }
}

/// Next connectivity flag.
///
/// Reports connected unless `draw` falls under `flip_probability`, in
/// which case the current flag is toggled.
pub fn next_connectivity(current: bool, draw: f64, flip_probability: f64) -> bool {
    if draw < flip_probability {
        !current
    } else {
        true
    }
}

/// Cancels the scheduler loops.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Signal both loops to exit. Calling it again has no effect.
    pub fn stop(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!("scheduler stopping");
        }
    }

    #[allow(dead_code)]
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Spawns and owns the refresh and connectivity loops.
pub struct Scheduler {
    state: Arc<SharedState>,
    refresh_interval: Duration,
    connectivity_interval: Duration,
    flip_probability: f64,
}

impl Scheduler {
    pub fn new(state: Arc<SharedState>, config: &MonitorConfig) -> Self {
        Self {
            state,
            refresh_interval: config.refresh_interval(),
            connectivity_interval: config.connectivity_interval(),
            flip_probability: config.connectivity_flip_probability,
        }
    }

    /// Publish the current state, then start both loops. The first
    /// refresh happens one period from now.
    pub async fn start(self) -> (StopHandle, Vec<JoinHandle<()>>) {
        publish(&self.state).await;

        let (tx, rx) = watch::channel(false);
        tracing::info!(
            "scheduler started: refresh every {:?}, connectivity every {:?}",
            self.refresh_interval,
            self.connectivity_interval
        );

        let refresh = tokio::spawn(refresh_loop(
            Arc::clone(&self.state),
            self.refresh_interval,
            rx.clone(),
        ));
        let connectivity = tokio::spawn(connectivity_loop(
            Arc::clone(&self.state),
            self.connectivity_interval,
            self.flip_probability,
            rx,
        ));

        (StopHandle { tx: Arc::new(tx) }, vec![refresh, connectivity])
    }
}

/// Bring every gauge in line with the shared state.
pub async fn publish(state: &SharedState) {
    let engine = state.engine.read().await;
    record_engine(&engine);
    metrics::record_connectivity(state.is_connected());
}

fn record_engine(engine: &TelemetryEngine) {
    metrics::record_window(engine.history().len(), engine.summary().ok().as_ref());
    metrics::record_alerts(&engine.alerts().counts());
}

/// Take one live reading and publish it.
pub async fn refresh(state: &SharedState) {
    let mut engine = state.engine.write().await;
    let update = engine.tick();
    metrics::record_update(&update);
    record_engine(&engine);
    state.refreshes.fetch_add(1, Ordering::SeqCst);
}

async fn refresh_loop(state: Arc<SharedState>, period: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *stop.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => refresh(&state).await,
            _ = stop.changed() => break,
        }
    }
    tracing::debug!("refresh loop exited");
}

async fn connectivity_loop(
    state: Arc<SharedState>,
    period: Duration,
    flip_probability: f64,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *stop.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                let current = state.is_connected();
                let next = next_connectivity(current, rand::random::<f64>(), flip_probability);
                if next != current {
                    tracing::info!("station connectivity changed: connected={}", next);
                }
                state.connected.store(next, Ordering::SeqCst);
                metrics::record_connectivity(next);
            }
            _ = stop.changed() => break,
        }
    }
    tracing::debug!("connectivity loop exited");
}

#[cfg(test)]
#[allow(clippy::await_holding_lock)]
mod tests {
    use super::*;
    use agroclima::{EngineConfig, GeneratorConfig};

    fn shared() -> Arc<SharedState> {
        let config = EngineConfig::new()
            .with_history_capacity(6)
            .with_generator(GeneratorConfig::new().with_seed(1));
        Arc::new(SharedState::new(TelemetryEngine::new(config).unwrap()))
    }

    #[test]
    fn test_next_connectivity() {
        assert!(next_connectivity(false, 0.5, 0.1));
        assert!(next_connectivity(true, 0.95, 0.1));
        assert!(!next_connectivity(true, 0.05, 0.1));
        assert!(next_connectivity(false, 0.05, 0.1));
        // Never flips
        assert!(next_connectivity(true, 0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_publishes_initial_state() {
        let _guard = metrics::test_guard();
        metrics::record_connectivity(false);
        metrics::record_window(0, None);
        metrics::record_alerts(&Default::default());

        let state = shared();
        let config = MonitorConfig::default();
        let (handle, _tasks) = Scheduler::new(Arc::clone(&state), &config).start().await;

        assert_eq!(metrics::STATION_CONNECTED.get(), 1.0);
        assert_eq!(metrics::WINDOW_READINGS.get(), 6.0);
        assert_eq!(metrics::ACTIVE_ALERTS.with_label_values(&["high"]).get(), 1.0);
        assert_eq!(metrics::ACTIVE_ALERTS.with_label_values(&["medium"]).get(), 1.0);
        assert_eq!(metrics::ACTIVE_ALERTS.with_label_values(&["low"]).get(), 1.0);
        let summary = state.engine.read().await.summary().unwrap();
        assert_eq!(
            metrics::DAY_SUMMARY.with_label_values(&["maxTemperature"]).get(),
            summary.max_temperature
        );
        assert_eq!(state.refresh_count(), 0);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_every_period() {
        let _guard = metrics::test_guard();
        let state = shared();
        let config = MonitorConfig::default();
        let (handle, _tasks) = Scheduler::new(Arc::clone(&state), &config).start().await;

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(state.refresh_count(), 3);
        assert_eq!(state.engine.read().await.history().len(), 6);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let _guard = metrics::test_guard();
        let state = shared();
        let config = MonitorConfig::default();
        let (handle, tasks) = Scheduler::new(Arc::clone(&state), &config).start().await;

        tokio::time::sleep(Duration::from_secs(6)).await;
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());

        for task in tasks {
            task.await.unwrap();
        }
        let count = state.refresh_count();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(state.refresh_count(), count);
    }

    #[tokio::test]
    async fn test_refresh_updates_engine() {
        let _guard = metrics::test_guard();
        let state = shared();
        let before = state.engine.read().await.current().clone();
        refresh(&state).await;

        let engine = state.engine.read().await;
        assert_eq!(engine.previous(), Some(&before));
        assert_eq!(state.refresh_count(), 1);
    }
}
