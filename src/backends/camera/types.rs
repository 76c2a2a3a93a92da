// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraBackendType {
    /// GStreamer pipeline on top of a V4L2 capture device
    #[default]
    GStreamer,
    /// Synthetic test pattern, no hardware involved
    Virtual,
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::GStreamer => write!(f, "GStreamer"),
            CameraBackendType::Virtual => write!(f, "virtual"),
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub path: String, // e.g. /dev/video0
    pub index: usize,
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// What the dashboard asks the platform for
///
/// Audio is never requested; the preview is video only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Explicit device path, or `None` for the first capture device found
    pub device_path: Option<String>,
    pub width: u32,
    pub height: u32,
    pub framerate: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            device_path: None,
            width: 640,
            height: 480,
            framerate: 30,
        }
    }
}

impl std::fmt::Display for StreamConstraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} @ {}fps", self.width, self.height, self.framerate)?;
        if let Some(path) = &self.device_path {
            write!(f, " on {}", path)?;
        }
        Ok(())
    }
}

/// A single preview frame, packed RGB24
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, may include padding
    pub stride: u32,
    pub data: Arc<[u8]>,
}

impl VideoFrame {
    /// Sample a pixel, clamping coordinates to the frame
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * 3) as usize;
        if idx + 2 < self.data.len() {
            (self.data[idx], self.data[idx + 1], self.data[idx + 2])
        } else {
            (0, 0, 0)
        }
    }
}

/// Frame receiver type for preview streams
pub type FrameReceiver = futures::channel::mpsc::Receiver<VideoFrame>;

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<VideoFrame>;

/// Result type for capture acquisition
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Why a capture stream could not be acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or the system refused access to the device
    PermissionDenied,
    /// No capture device present (or the configured path does not exist)
    NoDevice,
    /// Another process holds the device
    DeviceBusy,
    /// Anything else the platform reported
    Platform(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::PermissionDenied => write!(f, "Permission to access the camera was denied"),
            CaptureError::NoDevice => write!(f, "No camera device found"),
            CaptureError::DeviceBusy => write!(f, "Camera is busy"),
            CaptureError::Platform(msg) => write!(f, "Platform error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> VideoFrame {
        let data: Vec<u8> = (0..width * height)
            .flat_map(|i| [i as u8, (i * 2) as u8, (i * 3) as u8])
            .collect();
        VideoFrame {
            width,
            height,
            stride: width * 3,
            data: Arc::from(data),
        }
    }

    #[test]
    fn test_rgb_at_reads_packed_pixels() {
        let f = frame(4, 2);
        assert_eq!(f.rgb_at(0, 0), (0, 0, 0));
        assert_eq!(f.rgb_at(1, 0), (1, 2, 3));
        assert_eq!(f.rgb_at(0, 1), (4, 8, 12));
    }

    #[test]
    fn test_rgb_at_clamps_out_of_range() {
        let f = frame(4, 2);
        assert_eq!(f.rgb_at(100, 100), f.rgb_at(3, 1));
    }

    #[test]
    fn test_constraints_display() {
        let c = StreamConstraints {
            device_path: Some("/dev/video2".to_string()),
            ..Default::default()
        };
        assert_eq!(c.to_string(), "640x480 @ 30fps on /dev/video2");
    }
}
