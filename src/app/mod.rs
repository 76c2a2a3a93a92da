// SPDX-License-Identifier: GPL-3.0-only

//! Dashboard component
//!
//! [`Dashboard::mount`] is the init routine: it starts the flight timer and,
//! unless disabled, requests the camera. Dropping the dashboard is the
//! teardown routine: the camera session is released and the timer
//! cancelled, on every exit path.
//!
//! # Modules
//!
//! - `state`: view state, messages and control labels
//! - `update`: message handling
//! - `view`: terminal layout
//! - `widgets`: frame, gauge and tile widgets
//! - `ticker`: flight timer
//! - `camera_preview`: display surface for the camera stream
//! - `telemetry`: mock readouts

mod camera_preview;
mod state;
mod telemetry;
mod ticker;
mod update;
mod utils;
mod view;
mod widgets;

pub use camera_preview::PreviewSurface;
pub use state::{DashboardState, Message, recording_button_labels, webcam_button_labels};
pub use telemetry::{Readout, TelemetrySnapshot};
pub use ticker::ElapsedTicker;
pub use utils::{StatusLevel, format_flight_time};
pub use view::render;

use crate::backends::camera::{
    CaptureBackend, CaptureSessionManager, DisplaySurface, Notification, SessionState,
    StreamConstraints,
};
use crate::constants::timing;
use futures::channel::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Options applied when mounting
#[derive(Debug, Clone)]
pub struct MountOptions {
    pub constraints: StreamConstraints,
    /// Request the camera as part of mounting
    pub autostart_camera: bool,
    pub tick_period: Duration,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            constraints: StreamConstraints::default(),
            autostart_camera: true,
            tick_period: timing::TICK_PERIOD,
        }
    }
}

/// The mounted drone dashboard
pub struct Dashboard {
    state: DashboardState,
    telemetry: TelemetrySnapshot,
    session: CaptureSessionManager,
    ticker: ElapsedTicker,
    preview: Arc<Mutex<PreviewSurface>>,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl Dashboard {
    /// Mount the dashboard. Must be called from within a tokio runtime.
    pub fn mount(backend: Arc<dyn CaptureBackend>, options: MountOptions) -> Self {
        info!(backend = %backend.backend_type(), "Mounting dashboard");

        let preview = Arc::new(Mutex::new(PreviewSurface::new()));
        let surface: Arc<Mutex<dyn DisplaySurface>> = preview.clone();
        let (sender, notifications) = mpsc::unbounded();

        let mut session = CaptureSessionManager::new(
            backend,
            options.constraints,
            Arc::downgrade(&surface),
            sender,
        );
        if options.autostart_camera {
            session.start();
        }

        Self {
            state: DashboardState::default(),
            telemetry: TelemetrySnapshot::mock(),
            session,
            ticker: ElapsedTicker::start(options.tick_period),
            preview,
            notifications,
        }
    }

    /// Per-redraw housekeeping: fold in a camera grant, collect
    /// notifications and pull preview frames. Never blocks.
    pub fn refresh(&mut self) {
        self.session.poll();
        self.collect_notifications();
        if let Ok(mut preview) = self.preview.lock() {
            preview.pump();
        }
    }

    /// Wait for an in-flight camera request, then refresh
    pub async fn settle_capture(&mut self) -> SessionState {
        let state = self.session.settle().await;
        self.refresh();
        state
    }

    fn collect_notifications(&mut self) {
        while let Ok(Some(notification)) = self.notifications.try_next() {
            debug!(title = %notification.title, "Queueing alert");
            self.state.alerts.push_back(notification);
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        &self.telemetry
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.ticker.elapsed()
    }

    pub fn preview(&self) -> &Arc<Mutex<PreviewSurface>> {
        &self.preview
    }

    /// Tear down explicitly. Same as dropping.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        // Release the camera before the surface it is bound to goes away
        self.session.stop();
        self.ticker.stop();
        info!(elapsed = self.ticker.elapsed(), "Dashboard unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::virtual_camera::VirtualCameraBackend;

    fn options(autostart: bool) -> MountOptions {
        MountOptions {
            autostart_camera: autostart,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_requests_camera() {
        let backend = Arc::new(VirtualCameraBackend::new());
        let mut dashboard = Dashboard::mount(backend.clone(), options(true));
        assert_eq!(dashboard.session_state(), SessionState::Requesting);
        assert_eq!(dashboard.elapsed_seconds(), 0);

        assert_eq!(dashboard.settle_capture().await, SessionState::Active);
        assert!(dashboard.preview().lock().unwrap().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_without_autostart_stays_idle() {
        let backend = Arc::new(VirtualCameraBackend::new());
        let dashboard = Dashboard::mount(backend.clone(), options(false));
        assert_eq!(dashboard.session_state(), SessionState::Idle);
        assert!(!backend.device_lock().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_camera() {
        let backend = Arc::new(VirtualCameraBackend::new());
        let mut dashboard = Dashboard::mount(backend.clone(), options(true));
        dashboard.settle_capture().await;
        assert!(backend.device_lock().is_held());

        dashboard.unmount();
        assert!(!backend.device_lock().is_held());
        assert_eq!(backend.live_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_pulls_frames() {
        let backend = Arc::new(VirtualCameraBackend::new());
        let mut dashboard = Dashboard::mount(backend, options(true));
        dashboard.settle_capture().await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        dashboard.refresh();
        assert!(dashboard.preview().lock().unwrap().latest().is_some());
    }
}
