// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview surface
//!
//! The surface a granted stream is bound to. It keeps only the newest frame;
//! the view pulls pending frames once per redraw.

use crate::backends::camera::{DisplaySurface, FrameReceiver, VideoFrame};
use tracing::debug;

#[derive(Debug, Default)]
pub struct PreviewSurface {
    frames: Option<FrameReceiver>,
    latest: Option<VideoFrame>,
    frames_seen: u64,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.frames.is_some()
    }

    /// Drain all available frames, keeping the latest
    pub fn pump(&mut self) {
        let Some(frames) = self.frames.as_mut() else {
            return;
        };

        loop {
            match frames.try_next() {
                Ok(Some(frame)) => {
                    self.latest = Some(frame);
                    self.frames_seen += 1;
                }
                Ok(None) => {
                    // Source closed; keep the last frame until detached
                    debug!("Preview source closed");
                    self.frames = None;
                    break;
                }
                Err(_) => break,
            }
        }
    }

    pub fn latest(&self) -> Option<&VideoFrame> {
        self.latest.as_ref()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl DisplaySurface for PreviewSurface {
    fn attach(&mut self, frames: FrameReceiver) {
        debug!("Preview attached");
        self.frames = Some(frames);
        self.latest = None;
    }

    fn detach(&mut self) {
        debug!(frames = self.frames_seen, "Preview detached");
        self.frames = None;
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use std::sync::Arc;

    fn frame(width: u32) -> VideoFrame {
        VideoFrame {
            width,
            height: 1,
            stride: width * 3,
            data: Arc::from(vec![0u8; (width * 3) as usize]),
        }
    }

    #[test]
    fn test_pump_keeps_latest_frame() {
        let (mut tx, rx) = mpsc::channel(4);
        let mut surface = PreviewSurface::new();
        surface.attach(rx);

        tx.try_send(frame(1)).unwrap();
        tx.try_send(frame(2)).unwrap();
        surface.pump();

        assert_eq!(surface.latest().map(|f| f.width), Some(2));
        assert_eq!(surface.frames_seen(), 2);
    }

    #[test]
    fn test_detach_clears_frame() {
        let (mut tx, rx) = mpsc::channel(4);
        let mut surface = PreviewSurface::new();
        surface.attach(rx);
        tx.try_send(frame(1)).unwrap();
        surface.pump();

        surface.detach();
        assert!(!surface.is_attached());
        assert!(surface.latest().is_none());
    }

    #[test]
    fn test_closed_source_stops_pumping() {
        let (tx, rx) = mpsc::channel::<VideoFrame>(4);
        let mut surface = PreviewSurface::new();
        surface.attach(rx);
        drop(tx);

        surface.pump();
        assert!(!surface.is_attached());
    }
}
