// SPDX-License-Identifier: GPL-3.0-only

//! Formatting helpers for the dashboard

use crate::constants::status;
use ratatui::style::Color;

/// Format seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_flight_time(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}

/// Health band of a percentage gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Good,
    Warning,
    Critical,
}

impl StatusLevel {
    pub fn from_percent(value: u8) -> Self {
        if value > status::GOOD_ABOVE {
            StatusLevel::Good
        } else if value > status::WARNING_ABOVE {
            StatusLevel::Warning
        } else {
            StatusLevel::Critical
        }
    }

    pub fn color(&self) -> Color {
        match self {
            StatusLevel::Good => Color::Green,
            StatusLevel::Warning => Color::Yellow,
            StatusLevel::Critical => Color::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_flight_time() {
        assert_eq!(format_flight_time(0), "00:00:00");
        assert_eq!(format_flight_time(59), "00:00:59");
        assert_eq!(format_flight_time(61), "00:01:01");
        assert_eq!(format_flight_time(3_600), "01:00:00");
        assert_eq!(format_flight_time(360_000), "100:00:00");
    }

    #[test]
    fn test_status_level_thresholds() {
        assert_eq!(StatusLevel::from_percent(100), StatusLevel::Good);
        assert_eq!(StatusLevel::from_percent(71), StatusLevel::Good);
        assert_eq!(StatusLevel::from_percent(70), StatusLevel::Warning);
        assert_eq!(StatusLevel::from_percent(31), StatusLevel::Warning);
        assert_eq!(StatusLevel::from_percent(30), StatusLevel::Critical);
        assert_eq!(StatusLevel::from_percent(0), StatusLevel::Critical);
    }
}
