// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands that run without the dashboard

use drone_dashboard::backends::camera::{CameraBackendType, get_backend};

/// List capture devices the selected backend can see
pub fn list_cameras(backend_type: CameraBackendType) -> Result<(), Box<dyn std::error::Error>> {
    let backend = get_backend(backend_type);
    let cameras = backend.enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({}):", backend.backend_type());
    println!();
    for camera in &cameras {
        println!("  [{}] {}", camera.index, camera.name);
        println!("      Device: {}", camera.path);
    }

    Ok(())
}
