// AgroClima - Synthetic weather-station telemetry
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Station descriptor.

use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Static station reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub is_active: bool,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            id: "station-001".to_string(),
            name: "AgroClima Vega - Viveros El Jardín".to_string(),
            // La Vega, Dominican Republic
            location: GeoPoint {
                lat: 19.2237,
                lng: -70.5287,
            },
            is_active: true,
        }
    }
}
