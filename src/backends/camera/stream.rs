// SPDX-License-Identifier: GPL-3.0-only

//! Capture stream handles
//!
//! A [`MediaStream`] is what the platform hands back when camera access is
//! granted. It owns one or more [`MediaTrack`]s (a device can expose several
//! physical substreams) plus the receiver the preview frames arrive on.
//!
//! Dropping a stream stops every track that is still live, so the device
//! lock is released on every exit path, including panics and cancelled
//! requests.

use super::types::FrameReceiver;
use tracing::{debug, info};

/// Lifecycle of a single track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

/// One substream of a capture session
pub trait MediaTrack: Send {
    /// Unique id of the track
    fn id(&self) -> &str;

    /// Human readable label (usually the device name)
    fn label(&self) -> &str;

    fn state(&self) -> TrackState;

    /// Stop the track and release whatever device resources it holds.
    ///
    /// Stopping an ended track does nothing.
    fn stop(&mut self);
}

/// Handle to an active capture stream
pub struct MediaStream {
    id: String,
    tracks: Vec<Box<dyn MediaTrack>>,
    frames: Option<FrameReceiver>,
}

impl MediaStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>, frames: FrameReceiver) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks,
            frames: Some(frames),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.state() == TrackState::Live)
            .count()
    }

    /// Hand the frame receiver to a display surface.
    ///
    /// Returns `None` once taken.
    pub fn take_frames(&mut self) -> Option<FrameReceiver> {
        self.frames.take()
    }

    /// Stop every live track individually. Returns how many were stopped.
    pub fn stop_all_tracks(&mut self) -> usize {
        let mut stopped = 0;
        for track in self.tracks.iter_mut() {
            if track.state() == TrackState::Live {
                debug!(stream = %self.id, track = %track.id(), label = %track.label(), "Stopping track");
                track.stop();
                stopped += 1;
            }
        }
        self.frames = None;
        stopped
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        let stopped = self.stop_all_tracks();
        if stopped > 0 {
            info!(stream = %self.id, stopped, "Released tracks of dropped stream");
        }
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("live", &self.live_track_count())
            .finish()
    }
}
