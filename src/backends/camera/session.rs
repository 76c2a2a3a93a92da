// SPDX-License-Identifier: GPL-3.0-only

//! Capture session lifecycle
//!
//! The manager owns at most one [`MediaStream`]. Acquisition is asynchronous:
//! [`CaptureSessionManager::start`] spawns the platform request and returns
//! immediately, and the grant is folded back in from the UI loop by
//! [`CaptureSessionManager::poll`] (or awaited with
//! [`CaptureSessionManager::settle`]).
//!
//! ```text
//!   Idle ──start()──▶ Requesting ──grant──▶ Active
//!    ▲                    │                   │
//!    └──── denial ────────┘                   │
//!    └──────────── stop() / drop ─────────────┘
//! ```
//!
//! The display surface is held weakly. A grant that arrives after the
//! surface is gone is released on the spot instead of being attached.
//!
//! Stopping during `Requesting` does not abandon the platform request: device
//! opens may not be interruptible, so the request keeps draining in the
//! background and its late grant is released by [`CaptureSessionManager::poll`].
//! A `start()` while a request drains adopts it instead of opening the device
//! a second time.

use super::stream::MediaStream;
use super::types::{CaptureError, CaptureResult, StreamConstraints};
use super::{CaptureBackend, DisplaySurface};
use crate::constants::ui;
use futures::channel::{mpsc, oneshot};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, error, info, warn};

/// Where the session manager is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requesting,
    Active,
}

/// A blocking, user facing message raised by the session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Underlying cause, for the log and the detail line
    pub detail: Option<String>,
}

impl Notification {
    pub fn capture_failed(err: &CaptureError) -> Self {
        Self {
            title: ui::CAPTURE_FAILED_TITLE.to_string(),
            message: ui::CAPTURE_FAILED_MESSAGE.to_string(),
            detail: Some(err.to_string()),
        }
    }
}

/// In-flight acquisition
struct PendingRequest {
    receiver: oneshot::Receiver<CaptureResult<MediaStream>>,
    task: tokio::task::JoinHandle<()>,
}

/// Acquires and releases the local camera stream
pub struct CaptureSessionManager {
    backend: Arc<dyn CaptureBackend>,
    constraints: StreamConstraints,
    surface: Weak<Mutex<dyn DisplaySurface>>,
    notifications: mpsc::UnboundedSender<Notification>,
    stream: Option<MediaStream>,
    pending: Option<PendingRequest>,
    /// Cancelled request whose platform open has not finished yet
    draining: Option<PendingRequest>,
}

impl CaptureSessionManager {
    /// Create an idle manager
    ///
    /// # Arguments
    /// * `backend` - Host capture API
    /// * `constraints` - What to request on every `start()`
    /// * `surface` - Display surface granted streams are attached to
    /// * `notifications` - Sink for failure notifications
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        constraints: StreamConstraints,
        surface: Weak<Mutex<dyn DisplaySurface>>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        Self {
            backend,
            constraints,
            surface,
            notifications,
            stream: None,
            pending: None,
            draining: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.stream.is_some() {
            SessionState::Active
        } else if self.pending.is_some() {
            SessionState::Requesting
        } else {
            SessionState::Idle
        }
    }

    /// The active stream, if any
    pub fn stream(&self) -> Option<&MediaStream> {
        self.stream.as_ref()
    }

    /// Request a video-only stream from the backend.
    ///
    /// Does nothing while a request is in flight or a stream is active. A
    /// cancelled request that is still draining is resumed rather than
    /// issuing a second one. Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        match self.state() {
            SessionState::Idle => {}
            state => {
                debug!(?state, "Capture already started, ignoring start");
                return;
            }
        }

        if let Some(draining) = self.draining.take() {
            info!("Resuming cancelled capture request");
            self.pending = Some(draining);
            return;
        }

        info!(
            backend = %self.backend.backend_type(),
            constraints = %self.constraints,
            "Requesting capture stream"
        );

        let request = self.backend.request_stream(self.constraints.clone());
        let (sender, receiver) = oneshot::channel();
        let task = tokio::spawn(async move {
            // If the receiver is gone the stream comes back here and is
            // dropped, which stops its tracks.
            if let Err(Ok(stream)) = sender.send(request.await) {
                debug!(stream = %stream.id(), "Grant arrived after cancellation, releasing");
            }
        });

        self.pending = Some(PendingRequest { receiver, task });
    }

    /// Fold a resolved grant into the manager without blocking.
    pub fn poll(&mut self) -> SessionState {
        self.poll_draining();

        let Some(pending) = self.pending.as_mut() else {
            return self.state();
        };

        let result = match pending.receiver.try_recv() {
            Ok(None) => return SessionState::Requesting,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(CaptureError::Platform(
                "capture request was abandoned".to_string(),
            )),
        };

        self.pending = None;
        self.complete(result);
        self.state()
    }

    /// Wait for in-flight requests (including a draining one) to resolve
    /// and fold them in.
    pub async fn settle(&mut self) -> SessionState {
        if let Some(draining) = self.draining.take()
            && let Ok(result) = draining.receiver.await
        {
            Self::release_late_grant(result);
        }

        if let Some(pending) = self.pending.take() {
            let result = pending.receiver.await.unwrap_or_else(|_| {
                Err(CaptureError::Platform(
                    "capture request was abandoned".to_string(),
                ))
            });
            self.complete(result);
        }
        self.state()
    }

    fn poll_draining(&mut self) {
        let Some(draining) = self.draining.as_mut() else {
            return;
        };

        match draining.receiver.try_recv() {
            Ok(None) => {}
            Ok(Some(result)) => {
                self.draining = None;
                Self::release_late_grant(result);
            }
            Err(oneshot::Canceled) => {
                debug!("Cancelled capture request finished without a result");
                self.draining = None;
            }
        }
    }

    /// Release the outcome of a request nobody wants any more
    fn release_late_grant(result: CaptureResult<MediaStream>) {
        match result {
            Ok(mut stream) => {
                let stopped = stream.stop_all_tracks();
                info!(stream = %stream.id(), stopped, "Released grant of cancelled request");
            }
            Err(e) => debug!(error = %e, "Cancelled capture request failed"),
        }
    }

    fn complete(&mut self, result: CaptureResult<MediaStream>) {
        match result {
            Ok(mut stream) => {
                let Some(surface) = self.surface.upgrade() else {
                    warn!(stream = %stream.id(), "Display surface gone before grant, releasing stream");
                    stream.stop_all_tracks();
                    return;
                };

                match stream.take_frames() {
                    Some(frames) => match surface.lock() {
                        Ok(mut surface) => surface.attach(frames),
                        Err(_) => {
                            error!("Display surface lock poisoned, releasing stream");
                            stream.stop_all_tracks();
                            return;
                        }
                    },
                    None => warn!(stream = %stream.id(), "Granted stream has no frame source"),
                }

                info!(
                    stream = %stream.id(),
                    tracks = stream.tracks().len(),
                    "Capture session active"
                );
                self.stream = Some(stream);
            }
            Err(e) => {
                error!(error = %e, "Error accessing webcam");
                if self
                    .notifications
                    .unbounded_send(Notification::capture_failed(&e))
                    .is_err()
                {
                    debug!("Notification receiver gone");
                }
            }
        }
    }

    /// Release the active stream, or cancel an in-flight request.
    ///
    /// Tracks are stopped before this returns. A cancelled request keeps
    /// draining until the platform answers; see [`Self::poll`]. Without an
    /// active stream or request this is a no-op.
    pub fn stop(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!("Cancelling pending capture request");
            self.draining = Some(pending);
        }

        let Some(mut stream) = self.stream.take() else {
            debug!("No active capture session to stop");
            return;
        };

        let stopped = stream.stop_all_tracks();

        if let Some(surface) = self.surface.upgrade()
            && let Ok(mut surface) = surface.lock()
        {
            surface.detach();
        }

        info!(stream = %stream.id(), stopped, "Capture session stopped");
    }

    /// Start when idle, stop otherwise
    pub fn toggle(&mut self) {
        match self.state() {
            SessionState::Idle => self.start(),
            SessionState::Requesting | SessionState::Active => self.stop(),
        }
    }
}

impl Drop for CaptureSessionManager {
    fn drop(&mut self) {
        self.stop();
        // Nothing will poll again. Aborting drops the request future; a
        // stream that still arrives is dropped with the task's output.
        if let Some(draining) = self.draining.take() {
            draining.task.abort();
        }
    }
}

impl std::fmt::Debug for CaptureSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSessionManager")
            .field("backend", &self.backend.backend_type())
            .field("state", &self.state())
            .finish()
    }
}
