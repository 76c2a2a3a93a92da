// SPDX-License-Identifier: GPL-3.0-only

//! Dashboard state and messages

use crate::backends::camera::{Notification, SessionState};
use std::collections::VecDeque;

/// User interactions with the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Flip the recording indicator (nothing is recorded)
    ToggleRecording,
    /// Start or stop the local camera
    ToggleWebcam,
    /// Show or hide the key help line
    ToggleHelp,
    /// Close the alert on top
    DismissAlert,
    Quit,
}

/// Plain view state owned by the dashboard
#[derive(Debug, Default)]
pub struct DashboardState {
    pub recording: bool,
    pub show_help: bool,
    /// Alerts waiting to be acknowledged, oldest first
    pub alerts: VecDeque<Notification>,
}

impl DashboardState {
    pub fn toggle_recording(&mut self) {
        self.recording = !self.recording;
    }

    /// The alert currently blocking the dashboard, if any
    pub fn current_alert(&self) -> Option<&Notification> {
        self.alerts.front()
    }

    pub fn dismiss_alert(&mut self) -> Option<Notification> {
        self.alerts.pop_front()
    }
}

/// Title and subtitle of the recording button
pub fn recording_button_labels(recording: bool) -> (&'static str, &'static str) {
    if recording {
        ("Stop Recording", "Recording...")
    } else {
        ("Start Recording", "Ready")
    }
}

/// Title and subtitle of the webcam button
pub fn webcam_button_labels(state: SessionState) -> (&'static str, &'static str) {
    match state {
        SessionState::Active => ("Stop Webcam", "Connected"),
        SessionState::Requesting => ("Cancel", "Connecting..."),
        SessionState::Idle => ("Start Webcam", "Disconnected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_toggle_twice_restores_flag() {
        let mut state = DashboardState::default();
        state.toggle_recording();
        assert!(state.recording);
        state.toggle_recording();
        assert!(!state.recording);
        assert!(state.alerts.is_empty());
        assert!(!state.show_help);
    }

    #[test]
    fn test_alerts_dismissed_in_order() {
        let mut state = DashboardState::default();
        for message in ["first", "second"] {
            state.alerts.push_back(Notification {
                title: "t".to_string(),
                message: message.to_string(),
                detail: None,
            });
        }

        assert_eq!(state.current_alert().map(|n| n.message.as_str()), Some("first"));
        state.dismiss_alert();
        assert_eq!(state.current_alert().map(|n| n.message.as_str()), Some("second"));
        state.dismiss_alert();
        assert!(state.dismiss_alert().is_none());
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(recording_button_labels(false), ("Start Recording", "Ready"));
        assert_eq!(recording_button_labels(true), ("Stop Recording", "Recording..."));
        assert_eq!(webcam_button_labels(SessionState::Idle).1, "Disconnected");
        assert_eq!(webcam_button_labels(SessionState::Active).1, "Connected");
    }
}
