// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 capture device discovery

use super::super::types::CameraDevice;
use tracing::debug;
use v4l::capability::Flags;

/// List `/dev/video*` nodes that can capture video.
///
/// UVC cameras usually expose a second metadata-only node per device; those
/// are skipped.
pub fn enumerate_v4l2_cameras() -> Vec<CameraDevice> {
    let mut cameras = Vec::new();

    for node in v4l::context::enum_devices() {
        let path = node.path().to_string_lossy().to_string();

        let caps = match v4l::Device::with_path(node.path()).and_then(|d| d.query_caps()) {
            Ok(caps) => caps,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unreadable video node");
                continue;
            }
        };

        if !is_capture_device(caps.capabilities) {
            debug!(path = %path, "Skipping non-capture video node");
            continue;
        }

        let name = node.name().unwrap_or_else(|| caps.card.clone());
        cameras.push(CameraDevice {
            name,
            path,
            index: node.index(),
        });
    }

    cameras.sort_by_key(|c| c.index);
    debug!(count = cameras.len(), "Enumerated V4L2 cameras");
    cameras
}

fn is_capture_device(flags: Flags) -> bool {
    flags.contains(Flags::VIDEO_CAPTURE) || flags.contains(Flags::VIDEO_CAPTURE_MPLANE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_node_is_not_capture() {
        assert!(!is_capture_device(Flags::META_CAPTURE | Flags::STREAMING));
        assert!(is_capture_device(Flags::VIDEO_CAPTURE | Flags::STREAMING));
    }
}
