// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Dashboard (view)   │  ← owns the display surface
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │CaptureSessionManager│  ← Idle / Requesting / Active, at most one stream
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureBackend Trait│  ← request a video-only stream
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!  ┌─────────┐ ┌───────┐
//!  │GStreamer│ │Virtual│
//!  └─────────┘ └───────┘
//! ```

pub mod gst;
pub mod session;
pub mod stream;
pub mod types;
pub mod virtual_camera;

pub use session::{CaptureSessionManager, Notification, SessionState};
pub use stream::{MediaStream, MediaTrack, TrackState};
pub use types::*;

use futures::future::BoxFuture;
use std::sync::Arc;

/// Host capture API boundary
///
/// Implementations must never block the caller of `request_stream`; any
/// blocking device work belongs inside the returned future (typically on
/// tokio's blocking pool).
pub trait CaptureBackend: Send + Sync {
    /// Request a video-only capture stream.
    ///
    /// Resolves to the granted stream or the reason it was refused.
    fn request_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, CaptureResult<MediaStream>>;

    /// Enumerate capture devices this backend can open
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    fn backend_type(&self) -> CameraBackendType;
}

/// Something a granted stream can be bound to for rendering
pub trait DisplaySurface: Send {
    /// Start rendering frames from `frames`, replacing any previous source
    fn attach(&mut self, frames: FrameReceiver);

    /// Stop rendering and forget the current source
    fn detach(&mut self);
}

/// Get a backend instance for the configured type
pub fn get_backend(backend_type: CameraBackendType) -> Arc<dyn CaptureBackend> {
    match backend_type {
        CameraBackendType::GStreamer => Arc::new(gst::GStreamerBackend::new()),
        CameraBackendType::Virtual => Arc::new(virtual_camera::VirtualCameraBackend::new()),
    }
}
