// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! Produces a synthetic test pattern instead of opening hardware. Used by
//! `--virtual` and by the tests, which drive it through:
//! - scripted failures ([`VirtualCameraBackend::fail_next`])
//! - a grant delay standing in for the permission prompt
//! - several tracks per stream
//!
//! The single camera is guarded by a [`DeviceLock`], mirroring how a real
//! platform lets only one session hold the device.

use super::stream::{MediaStream, MediaTrack, TrackState};
use super::types::*;
use super::CaptureBackend;
use crate::constants::{pipeline, virtual_camera};
use futures::FutureExt;
use futures::channel::mpsc;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Exclusive claim on the virtual device
#[derive(Debug, Clone, Default)]
pub struct DeviceLock {
    holder: Arc<Mutex<Option<String>>>,
}

impl DeviceLock {
    /// Claim the device for `owner`, or `None` if someone else holds it
    pub fn try_acquire(&self, owner: &str) -> Option<DeviceLockGuard> {
        let mut holder = self.holder.lock().ok()?;
        if holder.is_some() {
            return None;
        }
        *holder = Some(owner.to_string());
        Some(DeviceLockGuard { lock: self.clone() })
    }

    pub fn is_held(&self) -> bool {
        self.holder.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    pub fn holder(&self) -> Option<String> {
        self.holder.lock().ok().and_then(|h| h.clone())
    }
}

/// Releases the device when the last track holding it lets go
#[derive(Debug)]
pub struct DeviceLockGuard {
    lock: DeviceLock,
}

impl Drop for DeviceLockGuard {
    fn drop(&mut self) {
        if let Ok(mut holder) = self.lock.holder.lock()
            && let Some(owner) = holder.take()
        {
            debug!(owner = %owner, "Virtual device released");
        }
    }
}

/// Track backed by the virtual device
struct VirtualTrack {
    id: String,
    label: String,
    guard: Option<Arc<DeviceLockGuard>>,
    producer: Option<tokio::task::JoinHandle<()>>,
    live_tracks: Arc<AtomicUsize>,
}

impl MediaTrack for VirtualTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> TrackState {
        if self.guard.is_some() {
            TrackState::Live
        } else {
            TrackState::Ended
        }
    }

    fn stop(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
        if self.guard.take().is_some() {
            self.live_tracks.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for VirtualTrack {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Synthetic camera backend
pub struct VirtualCameraBackend {
    lock: DeviceLock,
    live_tracks: Arc<AtomicUsize>,
    failures: Arc<Mutex<VecDeque<CaptureError>>>,
    grant_delay: Duration,
    track_count: usize,
}

impl VirtualCameraBackend {
    pub fn new() -> Self {
        Self {
            lock: DeviceLock::default(),
            live_tracks: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            grant_delay: Duration::ZERO,
            track_count: 1,
        }
    }

    /// Delay every grant, like a permission prompt the user answers slowly
    pub fn with_grant_delay(mut self, delay: Duration) -> Self {
        self.grant_delay = delay;
        self
    }

    /// Number of tracks per granted stream (at least one)
    pub fn with_track_count(mut self, count: usize) -> Self {
        self.track_count = count.max(1);
        self
    }

    /// Make the next request fail with `err`
    pub fn fail_next(&self, err: CaptureError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(err);
        }
    }

    pub fn device_lock(&self) -> &DeviceLock {
        &self.lock
    }

    /// Tracks granted and not yet stopped, across all streams
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }
}

impl Default for VirtualCameraBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for VirtualCameraBackend {
    fn request_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, CaptureResult<MediaStream>> {
        let lock = self.lock.clone();
        let live_tracks = Arc::clone(&self.live_tracks);
        let failures = Arc::clone(&self.failures);
        let grant_delay = self.grant_delay;
        let track_count = self.track_count;

        async move {
            if !grant_delay.is_zero() {
                tokio::time::sleep(grant_delay).await;
            }

            if let Some(err) = failures.lock().ok().and_then(|mut f| f.pop_front()) {
                debug!(error = %err, "Virtual camera failing request as scripted");
                return Err(err);
            }

            let owner = uuid::Uuid::new_v4().to_string();
            let guard = Arc::new(lock.try_acquire(&owner).ok_or(CaptureError::DeviceBusy)?);

            let (sender, receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
            let width = constraints.width.max(1);
            let height = constraints.height.max(1);
            // Frames belong to the first track, so stopping it ends the feed
            let mut producer = Some(tokio::spawn(produce_frames(sender, width, height)));

            let mut tracks: Vec<Box<dyn MediaTrack>> = Vec::with_capacity(track_count);
            for index in 0..track_count {
                live_tracks.fetch_add(1, Ordering::SeqCst);
                tracks.push(Box::new(VirtualTrack {
                    id: format!("{}-{}", owner, index),
                    label: virtual_camera::DEVICE_NAME.to_string(),
                    guard: Some(Arc::clone(&guard)),
                    producer: producer.take(),
                    live_tracks: Arc::clone(&live_tracks),
                }));
            }

            info!(width, height, tracks = track_count, "Virtual camera granted");
            Ok(MediaStream::new(tracks, receiver))
        }
        .boxed()
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice {
            name: virtual_camera::DEVICE_NAME.to_string(),
            path: virtual_camera::DEVICE_PATH.to_string(),
            index: 0,
        }]
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::Virtual
    }
}

/// Push test pattern frames until the receiver goes away
async fn produce_frames(mut sender: FrameSender, width: u32, height: u32) {
    let mut interval = tokio::time::interval(virtual_camera::FRAME_PERIOD);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut frame_index = 0u64;
    loop {
        interval.tick().await;
        let frame = test_pattern(width, height, frame_index);
        frame_index += 1;

        if let Err(e) = sender.try_send(frame) {
            if e.is_disconnected() {
                debug!(frames = frame_index, "Virtual camera receiver gone");
                break;
            }
            // Full: the view is behind, drop this frame
        }
    }
}

/// SMPTE-style color bars with a scan line sweeping down
pub fn test_pattern(width: u32, height: u32, frame_index: u64) -> VideoFrame {
    const BARS: [(u8, u8, u8); 7] = [
        (192, 192, 192),
        (192, 192, 0),
        (0, 192, 192),
        (0, 192, 0),
        (192, 0, 192),
        (192, 0, 0),
        (0, 0, 192),
    ];

    let stride = width * 3;
    let scan_row = (frame_index % height.max(1) as u64) as u32;
    let mut data = Vec::with_capacity((stride * height) as usize);

    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = if y == scan_row {
                (255, 255, 255)
            } else {
                BARS[(x as usize * BARS.len()) / width as usize]
            };
            data.extend_from_slice(&[r, g, b]);
        }
    }

    VideoFrame {
        width,
        height,
        stride,
        data: Arc::from(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_lock_is_exclusive() {
        let lock = DeviceLock::default();
        let guard = lock.try_acquire("a").unwrap();
        assert!(lock.try_acquire("b").is_none());
        assert_eq!(lock.holder().as_deref(), Some("a"));

        drop(guard);
        assert!(!lock.is_held());
        assert!(lock.try_acquire("b").is_some());
    }

    #[test]
    fn test_pattern_dimensions() {
        let frame = test_pattern(70, 10, 3);
        assert_eq!(frame.data.len(), 70 * 10 * 3);
        assert_eq!(frame.rgb_at(0, 0), (192, 192, 192));
        assert_eq!(frame.rgb_at(69, 0), (0, 0, 192));
        assert_eq!(frame.rgb_at(5, 3), (255, 255, 255));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_is_busy_while_granted() {
        let backend = VirtualCameraBackend::new();
        let first = backend
            .request_stream(StreamConstraints::default())
            .await
            .unwrap();
        let second = backend.request_stream(StreamConstraints::default()).await;
        assert_eq!(second.unwrap_err(), CaptureError::DeviceBusy);

        drop(first);
        assert!(!backend.device_lock().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_held_until_every_track_stops() {
        let backend = VirtualCameraBackend::new().with_track_count(3);
        let mut stream = backend
            .request_stream(StreamConstraints::default())
            .await
            .unwrap();
        assert_eq!(backend.live_tracks(), 3);
        assert!(backend.device_lock().is_held());

        stream.stop_all_tracks();
        assert_eq!(backend.live_tracks(), 0);
        assert!(!backend.device_lock().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_failure_then_success() {
        let backend = VirtualCameraBackend::new();
        backend.fail_next(CaptureError::NoDevice);

        let denied = backend.request_stream(StreamConstraints::default()).await;
        assert_eq!(denied.unwrap_err(), CaptureError::NoDevice);
        assert!(backend
            .request_stream(StreamConstraints::default())
            .await
            .is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_delivers_frames() {
        use futures::StreamExt;

        let backend = VirtualCameraBackend::new();
        let constraints = StreamConstraints {
            width: 32,
            height: 24,
            ..Default::default()
        };
        let mut stream = backend.request_stream(constraints).await.unwrap();
        let mut frames = stream.take_frames().unwrap();

        let frame = frames.next().await.unwrap();
        assert_eq!((frame.width, frame.height), (32, 24));
    }
}
