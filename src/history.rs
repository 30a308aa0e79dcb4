// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Rolling window of recent readings.

use crate::error::{Result, TelemetryError};
use crate::generator::SampleGenerator;
use crate::reading::Reading;
use std::collections::VecDeque;

/// Default window capacity (24 hourly samples).
pub const DEFAULT_CAPACITY: usize = 24;

/// Fixed-capacity window of readings, oldest first.
///
/// Pushing onto a full window drops the oldest reading. Pushes never fail.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    capacity: usize,
    readings: VecDeque<Reading>,
}

impl HistoryWindow {
    /// Create an empty window.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TelemetryError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        })
    }

    /// Create a window filled with `capacity` generated history readings.
    pub fn prefilled(generator: &mut SampleGenerator, capacity: usize) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        window.extend(generator.generate_history(capacity - 1)?);
        Ok(window)
    }

    /// Append a reading, evicting the oldest one if the window is full.
    pub fn push(&mut self, reading: Reading) {
        if self.readings.len() == self.capacity {
            if let Some(evicted) = self.readings.pop_front() {
                log::trace!("evicted reading {} from history window", evicted.id);
            }
        }
        self.readings.push_back(reading);
    }

    /// Push every reading in order.
    pub fn extend(&mut self, readings: impl IntoIterator<Item = Reading>) {
        for reading in readings {
            self.push(reading);
        }
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter()
    }

    /// Most recent reading.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Reading just before the most recent one.
    pub fn previous(&self) -> Option<&Reading> {
        self.readings.iter().rev().nth(1)
    }

    /// Number of readings held.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if the window holds no reading.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Check if the next push will evict.
    pub fn is_full(&self) -> bool {
        self.readings.len() == self.capacity
    }

    /// Maximum number of readings held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            readings: VecDeque::with_capacity(DEFAULT_CAPACITY),
        }
    }
}
