// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants and formatting

use drone_dashboard::app::{StatusLevel, TelemetrySnapshot, format_flight_time};
use drone_dashboard::constants::{telemetry, ui};

#[test]
fn test_mock_gauges_are_healthy() {
    let snapshot = TelemetrySnapshot::mock();
    assert_eq!(
        StatusLevel::from_percent(snapshot.battery_percent),
        StatusLevel::Good
    );
    assert_eq!(
        StatusLevel::from_percent(snapshot.signal_percent),
        StatusLevel::Good
    );
}

#[test]
fn test_flight_time_rollover() {
    assert_eq!(format_flight_time(3_599), "00:59:59");
    assert_eq!(format_flight_time(3_661), "01:01:01");
}

#[test]
fn test_ui_strings() {
    assert_eq!(ui::TITLE, "Drone Command Center");
    assert_eq!(
        ui::CAPTURE_FAILED_MESSAGE,
        "Could not access webcam. Please check permissions."
    );
    assert!(telemetry::RECORDING_BADGE.starts_with("REC "));
}
