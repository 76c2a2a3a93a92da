// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use drone_dashboard::backends::camera::{CameraBackendType, get_backend};
use drone_dashboard::constants::app_info;
use drone_dashboard::{Config, MountOptions};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "drone-dashboard")]
#[command(about = "Drone operator dashboard with a live camera feed")]
#[command(version = app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    dashboard: DashboardArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard (default)
    Dashboard(DashboardArgs),

    /// List available cameras
    List {
        /// List the virtual test camera instead of V4L2 devices
        #[arg(long = "virtual")]
        use_virtual: bool,
    },
}

#[derive(Args, Clone, Default)]
struct DashboardArgs {
    /// Use the virtual test camera instead of a real webcam
    #[arg(long = "virtual")]
    use_virtual: bool,

    /// Camera device path (e.g. /dev/video0)
    #[arg(short, long)]
    device: Option<String>,

    /// Preview width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Preview height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Do not request the camera on startup
    #[arg(long)]
    no_autostart: bool,

    /// Config file (default: ~/.config/drone-dashboard/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { use_virtual }) => {
            init_logging(false);
            let backend = if use_virtual {
                CameraBackendType::Virtual
            } else {
                CameraBackendType::GStreamer
            };
            cli::list_cameras(backend)
        }
        Some(Commands::Dashboard(args)) => run_dashboard(args),
        None => run_dashboard(cli.dashboard),
    }
}

fn run_dashboard(args: DashboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Log lines would corrupt the alternate screen
    init_logging(true);
    info!(version = app_info::version(), "Starting drone dashboard");

    let config_path = args.config.clone().or_else(Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(path)?,
        None => {
            warn!("No config directory available, using defaults");
            Config::default()
        }
    };
    apply_overrides(&mut config, &args);

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let options = MountOptions {
        constraints: config.constraints(),
        autostart_camera: config.autostart_camera,
        ..Default::default()
    };
    drone_dashboard::terminal::run(get_backend(config.backend), options)?;
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &DashboardArgs) {
    if args.use_virtual {
        config.backend = CameraBackendType::Virtual;
    }
    if let Some(device) = &args.device {
        config.device_path = Some(device.clone());
    }
    if let Some(width) = args.width {
        config.preview.width = width;
    }
    if let Some(height) = args.height {
        config.preview.height = height;
    }
    if args.no_autostart {
        config.autostart_camera = false;
    }
}

/// Set RUST_LOG to control the level, e.g. `RUST_LOG=drone_dashboard=debug`.
/// With `to_file` the output goes to `dashboard.log` in the state directory.
fn init_logging(to_file: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    if !to_file {
        builder.init();
        return;
    }

    let log_file = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("drone-dashboard"))
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("dashboard.log"))
                .ok()
        });

    match log_file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}
