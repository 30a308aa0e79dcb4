// AgroClima Monitor - Refresh scheduler and HTTP surface
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! CSV export of generated history.

use crate::error::Result;
use agroclima::{Reading, SampleGenerator};
use std::io::Write;
use std::path::Path;

/// Write readings as CSV with camelCase headers, oldest first.
pub fn write_readings<W: Write>(writer: W, readings: &[Reading]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for reading in readings {
        csv.serialize(reading)?;
    }
    csv.flush()?;
    Ok(())
}

/// Generate `hours + 1` hourly readings and write them to `path`.
///
/// Returns the number of rows written.
pub fn export_history(
    generator: &mut SampleGenerator,
    hours: usize,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let readings = generator.generate_history(hours)?;
    let file = std::fs::File::create(path.as_ref())?;
    write_readings(file, &readings)?;
    tracing::info!(
        "exported {} readings to {}",
        readings.len(),
        path.as_ref().display()
    );
    Ok(readings.len())
}
