// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Opens a V4L2 webcam through `v4l2src` and delivers RGB preview frames via
//! an appsink. Device discovery and pipeline start both block, so the whole
//! request runs on tokio's blocking pool.

mod enumeration;
mod pipeline;

pub use enumeration::enumerate_v4l2_cameras;
pub use pipeline::{PipelineTrack, build_pipeline_string, classify_error, open_stream};

use super::stream::MediaStream;
use super::types::*;
use super::CaptureBackend;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::Path;
use tracing::{debug, info};

/// Webcam backend built on GStreamer
#[derive(Debug, Default)]
pub struct GStreamerBackend;

impl GStreamerBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Pick the device to open: the configured path, or the first camera found
fn resolve_device(constraints: &StreamConstraints) -> CaptureResult<CameraDevice> {
    match &constraints.device_path {
        Some(path) => {
            if !Path::new(path).exists() {
                debug!(path = %path, "Configured camera path does not exist");
                return Err(CaptureError::NoDevice);
            }
            Ok(enumerate_v4l2_cameras()
                .into_iter()
                .find(|c| &c.path == path)
                .unwrap_or_else(|| CameraDevice {
                    name: path.clone(),
                    path: path.clone(),
                    index: 0,
                }))
        }
        None => enumerate_v4l2_cameras()
            .into_iter()
            .next()
            .ok_or(CaptureError::NoDevice),
    }
}

impl CaptureBackend for GStreamerBackend {
    fn request_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, CaptureResult<MediaStream>> {
        async move {
            // The blocking open cannot be interrupted; the session manager
            // keeps a cancelled request draining until this resolves.
            tokio::task::spawn_blocking(move || {
                let device = resolve_device(&constraints)?;
                info!(device = %device, "Opening camera");
                open_stream(&device, &constraints)
            })
            .await
            .map_err(|e| CaptureError::Platform(format!("capture task failed: {}", e)))?
        }
        .boxed()
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        enumerate_v4l2_cameras()
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::GStreamer
    }
}
