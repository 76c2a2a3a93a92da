// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer capture pipeline
//!
//! `v4l2src → videoconvert → videoscale → videorate → RGB caps → appsink`.
//! Everything here blocks on GStreamer state changes and must run off the
//! UI thread.

use super::super::stream::{MediaStream, MediaTrack, TrackState};
use super::super::types::*;
use crate::constants::{pipeline, timing};
use futures::channel::mpsc;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Build the launch string for a device and constraints
pub fn build_pipeline_string(device_path: &str, constraints: &StreamConstraints) -> String {
    format!(
        "v4l2src device={} ! videoconvert ! videoscale ! videorate ! \
         video/x-raw,format={},width={},height={},framerate={}/1 ! \
         appsink name=sink",
        device_path,
        pipeline::OUTPUT_FORMAT,
        constraints.width,
        constraints.height,
        constraints.framerate.max(1),
    )
}

/// Map a GStreamer error into the capture error the dashboard reports.
///
/// v4l2src reports most open failures as `OpenRead`/`OpenReadWrite` with the
/// errno text in the message, so the text is checked as well as the domain.
pub fn classify_error(resource: Option<gstreamer::ResourceError>, message: &str) -> CaptureError {
    match resource {
        Some(gstreamer::ResourceError::NotAuthorized) => return CaptureError::PermissionDenied,
        Some(gstreamer::ResourceError::Busy) => return CaptureError::DeviceBusy,
        Some(gstreamer::ResourceError::NotFound) => return CaptureError::NoDevice,
        _ => {}
    }

    let lower = message.to_lowercase();
    if lower.contains("permission denied") || lower.contains("not authorized") {
        CaptureError::PermissionDenied
    } else if lower.contains("busy") {
        CaptureError::DeviceBusy
    } else if lower.contains("no such file")
        || lower.contains("cannot identify device")
        || lower.contains("no such device")
        || lower.contains("not a capture device")
    {
        CaptureError::NoDevice
    } else {
        CaptureError::Platform(message.to_string())
    }
}

/// Pop the first error posted on the pipeline bus, if any
fn take_bus_error(pipeline: &gstreamer::Pipeline) -> Option<CaptureError> {
    let bus = pipeline.bus()?;
    let msg = bus.timed_pop_filtered(
        gstreamer::ClockTime::ZERO,
        &[gstreamer::MessageType::Error],
    )?;

    match msg.view() {
        gstreamer::MessageView::Error(err) => {
            let glib_err = err.error();
            let text = match err.debug() {
                Some(debug) => format!("{} ({})", glib_err.message(), debug),
                None => glib_err.message().to_string(),
            };
            warn!(error = %text, "Capture pipeline error");
            Some(classify_error(
                glib_err.kind::<gstreamer::ResourceError>(),
                &text,
            ))
        }
        _ => None,
    }
}

/// Video track backed by a running GStreamer pipeline
pub struct PipelineTrack {
    id: String,
    label: String,
    pipeline: Option<gstreamer::Pipeline>,
    appsink: AppSink,
}

impl PipelineTrack {
    /// Close the device. The change to Null is synchronous, so the device
    /// is released when this returns.
    fn shutdown(pipeline: &gstreamer::Pipeline) {
        match pipeline.set_state(gstreamer::State::Null) {
            Ok(_) => debug!("Capture pipeline stopped"),
            Err(e) => error!(error = %e, "Failed to stop capture pipeline"),
        }
    }
}

impl MediaTrack for PipelineTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> TrackState {
        if self.pipeline.is_some() {
            TrackState::Live
        } else {
            TrackState::Ended
        }
    }

    fn stop(&mut self) {
        let Some(pipeline) = self.pipeline.take() else {
            return;
        };

        // Clear callbacks so the frame sender is released with the pipeline
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        Self::shutdown(&pipeline);
        info!(track = %self.id, device = %self.label, "Camera released");
    }
}

impl Drop for PipelineTrack {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open `device` and return a live stream. Blocks until the pipeline plays.
pub fn open_stream(
    device: &CameraDevice,
    constraints: &StreamConstraints,
) -> CaptureResult<MediaStream> {
    gstreamer::init().map_err(|e| CaptureError::Platform(e.to_string()))?;

    let launch = build_pipeline_string(&device.path, constraints);
    info!(device = %device, pipeline = %launch, "Creating capture pipeline");

    let pipeline = gstreamer::parse::launch(&launch)
        .map_err(|e| CaptureError::Platform(e.to_string()))?
        .downcast::<gstreamer::Pipeline>()
        .map_err(|_| CaptureError::Platform("launch did not produce a pipeline".to_string()))?;

    let appsink = pipeline
        .by_name("sink")
        .ok_or_else(|| CaptureError::Platform("Failed to get appsink".to_string()))?
        .dynamic_cast::<AppSink>()
        .map_err(|_| CaptureError::Platform("Failed to cast appsink".to_string()))?;

    appsink.set_property("sync", false);
    appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
    appsink.set_property("drop", true);
    appsink.set_property("enable-last-sample", false);

    let (sender, receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    appsink.set_callbacks(
        gstreamer_app::AppSinkCallbacks::builder()
            .new_sample(new_sample_handler(sender))
            .build(),
    );

    if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
        let err = take_bus_error(&pipeline)
            .unwrap_or_else(|| CaptureError::Platform(format!("Failed to start pipeline: {}", e)));
        PipelineTrack::shutdown(&pipeline);
        return Err(err);
    }

    let (_, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
        timing::START_TIMEOUT_SECS,
    ));
    debug!(state = ?state, pending = ?pending, "Pipeline state after start");

    if let Some(err) = take_bus_error(&pipeline) {
        PipelineTrack::shutdown(&pipeline);
        return Err(err);
    }
    if state != gstreamer::State::Playing {
        PipelineTrack::shutdown(&pipeline);
        return Err(CaptureError::Platform(format!(
            "Pipeline did not start within {}s",
            timing::START_TIMEOUT_SECS
        )));
    }

    info!(device = %device, "Capture pipeline playing");

    let track = PipelineTrack {
        id: uuid::Uuid::new_v4().to_string(),
        label: device.name.clone(),
        pipeline: Some(pipeline),
        appsink,
    };

    let tracks: Vec<Box<dyn MediaTrack>> = vec![Box::new(track)];
    Ok(MediaStream::new(tracks, receiver))
}

/// Appsink callback copying each RGB sample into a [`VideoFrame`]
fn new_sample_handler(
    sender: FrameSender,
) -> impl FnMut(&AppSink) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> + Send + 'static
{
    let counter = Arc::new(AtomicU64::new(0));

    move |appsink| {
        let captured_at = Instant::now();
        let frame_num = counter.fetch_add(1, Ordering::Relaxed);

        let sample = appsink
            .pull_sample()
            .map_err(|_| gstreamer::FlowError::Eos)?;
        let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
        let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
        let video_info = VideoInfo::from_caps(caps).map_err(|e| {
            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                error!(frame = frame_num, error = ?e, "Failed to get video info");
            }
            gstreamer::FlowError::Error
        })?;
        let map = buffer.map_readable().map_err(|_| gstreamer::FlowError::Error)?;

        let frame = VideoFrame {
            width: video_info.width(),
            height: video_info.height(),
            stride: video_info.stride()[0] as u32,
            data: Arc::from(map.as_slice()),
        };

        let mut sender = sender.clone();
        match sender.try_send(frame) {
            Ok(()) => {
                if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                    debug!(
                        frame = frame_num,
                        width = video_info.width(),
                        height = video_info.height(),
                        latency_us = captured_at.elapsed().as_micros() as u64,
                        "Frame delivered"
                    );
                }
                Ok(gstreamer::FlowSuccess::Ok)
            }
            Err(e) if e.is_disconnected() => Err(gstreamer::FlowError::Eos),
            // View is behind, drop the frame
            Err(_) => Ok(gstreamer::FlowSuccess::Ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_string_carries_constraints() {
        let constraints = StreamConstraints {
            device_path: None,
            width: 320,
            height: 240,
            framerate: 15,
        };
        let launch = build_pipeline_string("/dev/video0", &constraints);
        assert!(launch.starts_with("v4l2src device=/dev/video0 "));
        assert!(launch.contains("format=RGB,width=320,height=240,framerate=15/1"));
        assert!(launch.ends_with("appsink name=sink"));
    }

    #[test]
    fn test_classify_by_resource_domain() {
        assert_eq!(
            classify_error(Some(gstreamer::ResourceError::Busy), ""),
            CaptureError::DeviceBusy
        );
        assert_eq!(
            classify_error(Some(gstreamer::ResourceError::NotAuthorized), ""),
            CaptureError::PermissionDenied
        );
        assert_eq!(
            classify_error(Some(gstreamer::ResourceError::NotFound), ""),
            CaptureError::NoDevice
        );
    }

    #[test]
    fn test_classify_by_errno_text() {
        assert_eq!(
            classify_error(
                Some(gstreamer::ResourceError::OpenReadWrite),
                "Could not open device '/dev/video0' for reading and writing. (Permission denied)"
            ),
            CaptureError::PermissionDenied
        );
        assert_eq!(
            classify_error(
                Some(gstreamer::ResourceError::OpenRead),
                "Device '/dev/video0' is busy"
            ),
            CaptureError::DeviceBusy
        );
        assert_eq!(
            classify_error(None, "Cannot identify device '/dev/video9'. (No such file or directory)"),
            CaptureError::NoDevice
        );
    }

    #[test]
    fn test_classify_falls_back_to_platform() {
        assert_eq!(
            classify_error(None, "internal data stream error"),
            CaptureError::Platform("internal data stream error".to_string())
        );
    }
}
