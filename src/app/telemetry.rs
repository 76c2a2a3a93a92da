// SPDX-License-Identifier: GPL-3.0-only

//! Mock telemetry readouts
//!
//! Fixed display values; nothing here is read from a vehicle.

use crate::constants::telemetry;

/// One labelled readout tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub label: &'static str,
    pub value: String,
}

impl Readout {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub battery_percent: u8,
    pub signal_percent: u8,
    pub altitude_m: u32,
    pub speed_mph: u32,
    pub wind_mph: u32,
    pub wind_direction: &'static str,
    pub heading_deg: u16,
    pub distance_km: f32,
    pub max_altitude_m: u32,
    pub max_speed_mph: u32,
    pub storage_gb: f32,
}

impl TelemetrySnapshot {
    pub fn mock() -> Self {
        Self {
            battery_percent: telemetry::BATTERY_PERCENT,
            signal_percent: telemetry::SIGNAL_PERCENT,
            altitude_m: telemetry::ALTITUDE_M,
            speed_mph: telemetry::SPEED_MPH,
            wind_mph: telemetry::WIND_MPH,
            wind_direction: telemetry::WIND_DIRECTION,
            heading_deg: telemetry::HEADING_DEG,
            distance_km: telemetry::DISTANCE_KM,
            max_altitude_m: telemetry::MAX_ALTITUDE_M,
            max_speed_mph: telemetry::MAX_SPEED_MPH,
            storage_gb: telemetry::STORAGE_GB,
        }
    }

    /// Tiles overlaid at the bottom of the video feed
    pub fn feed_readouts(&self) -> [Readout; 4] {
        [
            Readout::new("Altitude", format!("{}m", self.altitude_m)),
            Readout::new("Speed", format!("{} mph", self.speed_mph)),
            Readout::new(
                "Wind",
                format!("{} mph {}", self.wind_mph, self.wind_direction),
            ),
            Readout::new("Heading", format!("{}°", self.heading_deg)),
        ]
    }

    /// Tiles of the side panel
    pub fn flight_statistics(&self) -> [Readout; 4] {
        [
            Readout::new("Distance", format!("{:.1} km", self.distance_km)),
            Readout::new("Max Alt", format!("{} m", self.max_altitude_m)),
            Readout::new("Max Speed", format!("{} mph", self.max_speed_mph)),
            Readout::new("Storage", format!("{:.1} GB", self.storage_gb)),
        ]
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::mock()
    }
}
