#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunk
//!
//! The chunk core of a voxel renderer: one 16×256×16 column of blocks, the
//! capabilities blocks carry, the point lights they emit, and the lifecycle that
//! takes a chunk from population through culling, GPU load and per-frame
//! rendering to teardown.
//!
//! ## Key Modules
//!
//! * `config` - JSON configuration and command-line overrides
//! * `engine_state` - The chunk core plus the frame loop that drives it
//!
//! ## Architecture
//!
//! The graphics layer sits behind the [`RenderBackend`] trait. A wgpu-backed
//! implementation runs against a headless device; an in-memory recording
//! implementation runs anywhere and is what the tests observe.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_chunk::config::EngineConfig;
//! use voxel_chunk::engine_state::{rendering::recording::RecordingBackend, EngineState};
//!
//! let mut state = EngineState::demo(&EngineConfig::default(), RecordingBackend::new())?;
//! let report = state.frame();
//! assert!(report.render.draws > 0);
//! state.shutdown();
//! # Ok::<(), voxel_chunk::engine_state::EngineError>(())
//! ```
//!
//! [`RenderBackend`]: engine_state::rendering::RenderBackend

use std::{
    io::{self, BufRead},
    thread,
    time::Duration,
};

use cgmath::Vector3;
use clap::Parser;
use log::{debug, info, trace, warn};
use thiserror::Error;

use config::{CliArgs, ConfigError, EngineConfig};
use engine_state::{
    notifications::NotificationSender,
    rendering::{recording::RecordingBackend, wgpu_backend::WgpuBackend, RenderBackend},
    EngineError, EngineState,
};

pub mod config;
pub mod engine_state;

/// Pause between demo frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Camera movement per demo frame.
const CAMERA_DRIFT: Vector3<f32> = Vector3 {
    x: 0.05,
    y: -0.01,
    z: 0.05,
};

/// Errors that end a demo run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The config file could not be used
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The engine could not start
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Runs the headless demo: parses arguments, loads config, drives the demo chunk
/// for the configured number of frames and tears it down.
///
/// Lines typed on stdin are fed to the notification queue, so scene commands such
/// as `{"command":"remove_block","x":4,"y":1,"z":4}` edit the chunk live.
pub fn run() -> Result<(), RunError> {
    let args = CliArgs::parse();

    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_filters(args.log_filter())
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let mut config = match args.config {
        Some(ref path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.apply_cli_overrides(&args);

    if args.gpu {
        match WgpuBackend::request_headless() {
            Ok(backend) => {
                return run_scene(&config, backend, |backend| {
                    let commands = backend.take_frame_commands();
                    trace!("Frame submitted {} GPU commands", commands.len());
                    debug!(
                        "GPU buffers: {} bytes allocated, {} bytes used, {} vertex layouts",
                        backend.get_total_allocated_memory(),
                        backend.get_total_used_memory(),
                        backend.bound_layout_count()
                    );
                });
            }
            Err(err) => warn!("No GPU device ({}), using the recording backend", err),
        }
    }

    run_scene(&config, RecordingBackend::new(), |backend| {
        trace!("Frame recorded {} calls", backend.calls.len());
        backend.clear_calls();
    })
}

/// Drives the demo scene on `backend`, calling `after_frame` once per frame.
fn run_scene<B: RenderBackend>(
    config: &EngineConfig,
    backend: B,
    mut after_frame: impl FnMut(&mut B),
) -> Result<(), RunError> {
    let mut state = EngineState::demo(config, backend)?;
    spawn_stdin_reader(state.notification_sender());

    for _ in 0..config.frames {
        let report = state.frame();
        if report.edits > 0 {
            info!(
                "Frame {}: {} edits, {} draws",
                state.frames(),
                report.edits,
                report.render.draws
            );
        }
        debug!("Camera cell: {}", report.camera_cell);
        after_frame(state.backend_mut());
        state.camera_state.translate(CAMERA_DRIFT);
        thread::sleep(FRAME_INTERVAL);
    }

    state.shutdown();
    info!("Demo finished after {} frames", state.frames());
    Ok(())
}

/// Forwards stdin lines to the notification queue until either side closes.
fn spawn_stdin_reader(sender: NotificationSender) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if !line.trim().is_empty() && !sender.notify(line) {
                break;
            }
        }
    });
}
