// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Flight timer period
    pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

    /// How long the terminal loop waits for input before redrawing
    pub const EVENT_POLL: Duration = Duration::from_millis(16);

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Output pixel format for appsink, packed RGB for terminal sampling
    pub const OUTPUT_FORMAT: &str = "RGB";

    /// Preview frames buffered between the capture thread and the view
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
}

/// Virtual camera constants
pub mod virtual_camera {
    use super::Duration;

    /// Frame period of the synthetic test pattern (~30fps)
    pub const FRAME_PERIOD: Duration = Duration::from_millis(33);

    /// Device name reported by the virtual backend
    pub const DEVICE_NAME: &str = "Virtual Drone Camera";

    /// Device path reported by the virtual backend
    pub const DEVICE_PATH: &str = "virtual:0";
}

/// Mock telemetry shown on the dashboard
///
/// None of these come from a vehicle; they are fixed display values.
pub mod telemetry {
    pub const BATTERY_PERCENT: u8 = 85;
    pub const SIGNAL_PERCENT: u8 = 90;
    pub const ALTITUDE_M: u32 = 120;
    pub const SPEED_MPH: u32 = 15;
    pub const WIND_MPH: u32 = 12;
    pub const WIND_DIRECTION: &str = "NW";
    pub const HEADING_DEG: u16 = 245;
    pub const DISTANCE_KM: f32 = 1.2;
    pub const MAX_ALTITUDE_M: u32 = 150;
    pub const MAX_SPEED_MPH: u32 = 25;
    pub const STORAGE_GB: f32 = 64.2;
    pub const VIDEO_MODE: &str = "4K Ultra HD • 60fps";
    pub const RECORDING_BADGE: &str = "REC 00:12:44";
}

/// Gauge color thresholds (percent)
pub mod status {
    /// Above this a gauge is healthy
    pub const GOOD_ABOVE: u8 = 70;

    /// Above this (and not healthy) a gauge is a warning
    pub const WARNING_ABOVE: u8 = 30;
}

/// User facing strings
pub mod ui {
    pub const TITLE: &str = "Drone Command Center";
    pub const BADGE: &str = "DC";
    pub const LIVE_CONNECTION: &str = "Live Connection";
    pub const WAITING_FOR_CAMERA: &str = "Waiting for camera...";
    pub const CAMERA_OFF: &str = "Camera off";
    pub const CAPTURE_FAILED_TITLE: &str = "Webcam";
    pub const CAPTURE_FAILED_MESSAGE: &str = "Could not access webcam. Please check permissions.";
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
