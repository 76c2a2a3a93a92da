// SPDX-License-Identifier: GPL-3.0-only

//! Drone Dashboard - a terminal operator console for a drone
//!
//! Shows the local webcam as the live feed next to mock flight telemetry,
//! a flight timer and recording/webcam controls.
//!
//! # Architecture
//!
//! - [`app`]: the dashboard component, its state, update and view
//! - [`backends`]: capture backends and the capture session manager
//! - [`config`]: user configuration handling
//! - [`terminal`]: raw-mode terminal front end

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod terminal;

// Re-export commonly used types
pub use app::{Dashboard, Message, MountOptions};
pub use config::Config;
pub use errors::{AppError, AppResult};
