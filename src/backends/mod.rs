// SPDX-License-Identifier: GPL-3.0-only

//! Platform backends
//!
//! Only camera capture lives here; the dashboard has no other device I/O.

pub mod camera;
