// SPDX-License-Identifier: GPL-3.0-only

//! Message handling for the dashboard

use super::{Dashboard, Message};
use tracing::{debug, info};

impl Dashboard {
    /// Apply a message. Returns `false` when the dashboard should close.
    ///
    /// While an alert is open only `DismissAlert` and `Quit` are handled.
    pub fn update(&mut self, message: Message) -> bool {
        if self.state.current_alert().is_some()
            && !matches!(message, Message::DismissAlert | Message::Quit)
        {
            debug!(?message, "Ignoring message while alert is open");
            return true;
        }

        match message {
            Message::ToggleRecording => {
                self.state.toggle_recording();
                info!(recording = self.state.recording, "Recording toggled");
            }
            Message::ToggleWebcam => {
                self.session.toggle();
                debug!(state = ?self.session.state(), "Webcam toggled");
            }
            Message::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
            }
            Message::DismissAlert => {
                self.state.dismiss_alert();
            }
            Message::Quit => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MountOptions;
    use crate::backends::camera::virtual_camera::VirtualCameraBackend;
    use crate::backends::camera::{CaptureError, SessionState};
    use std::sync::Arc;

    fn idle_dashboard(backend: Arc<VirtualCameraBackend>) -> Dashboard {
        Dashboard::mount(
            backend,
            MountOptions {
                autostart_camera: false,
                ..Default::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_webcam_toggle_cycle() {
        let backend = Arc::new(VirtualCameraBackend::new());
        let mut dashboard = idle_dashboard(backend.clone());

        assert!(dashboard.update(Message::ToggleWebcam));
        assert_eq!(dashboard.settle_capture().await, SessionState::Active);

        assert!(dashboard.update(Message::ToggleWebcam));
        assert_eq!(dashboard.session_state(), SessionState::Idle);
        assert!(!backend.device_lock().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_blocks_other_messages() {
        let backend = Arc::new(VirtualCameraBackend::new());
        backend.fail_next(CaptureError::PermissionDenied);
        let mut dashboard = idle_dashboard(backend);

        dashboard.update(Message::ToggleWebcam);
        dashboard.settle_capture().await;
        assert!(dashboard.state().current_alert().is_some());

        dashboard.update(Message::ToggleRecording);
        assert!(!dashboard.state().recording);

        dashboard.update(Message::DismissAlert);
        assert!(dashboard.state().current_alert().is_none());
        dashboard.update(Message::ToggleRecording);
        assert!(dashboard.state().recording);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_returns_false() {
        let mut dashboard = idle_dashboard(Arc::new(VirtualCameraBackend::new()));
        assert!(dashboard.update(Message::ToggleHelp));
        assert!(dashboard.state().show_help);
        assert!(!dashboard.update(Message::Quit));
    }
}
