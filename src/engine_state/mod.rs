//! # Engine State Module
//!
//! Drives one voxel chunk through its lifetime: construction, resource load,
//! per-frame editing and rendering, and teardown.
//!
//! ## Key Components
//!
//! * `EngineState` - The frame loop's state container
//! * `camera_state` - The viewer's camera and projection
//! * `lighting` - Point lights and their GPU layout
//! * `notifications` - Inbound message queue fed by I/O threads
//! * `rendering` - The rendering backend seam, asset registry and cube geometry
//! * `scene` - The demo chunk and assets
//! * `voxels` - Coordinates, blocks, capabilities and the chunk itself
//!
//! ## Frame Order
//!
//! Each frame drains a bounded batch of notifications, applies any scene commands
//! among them, reculls the chunk if it changed, describes the block under the
//! camera and finally renders.

use cgmath::Point3;
use log::{debug, info, warn};
use thiserror::Error;

use camera_state::CameraState;
use notifications::{NotificationQueue, NotificationSender};
use rendering::{AssetRegistry, RenderBackend};
use voxels::{
    capability::CapabilityOwner,
    chunk::{Chunk, LoadError, RenderStats},
    commands::Notification,
};

use crate::config::EngineConfig;

pub mod camera_state;
pub mod lighting;
pub mod notifications;
pub mod rendering;
pub mod scene;
pub mod voxels;

/// Errors raised while bringing up the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The demo scene could not be built
    #[error("failed to build scene: {0}")]
    Scene(#[from] scene::SceneError),
    /// The chunk's GPU resources could not be created
    #[error("failed to load chunk: {0}")]
    Load(#[from] LoadError),
}

/// What one call to [`EngineState::frame`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Scene commands applied this frame
    pub edits: usize,
    /// Counters from the render pass
    pub render: RenderStats,
    /// Description of the cell under the camera
    pub camera_cell: String,
}

/// The frame loop's state: one chunk, its assets, the viewer and the inbound queue.
///
/// Dropping the state releases the chunk's GPU resources through the backend.
pub struct EngineState<B: RenderBackend> {
    /// The viewer
    pub camera_state: CameraState,
    chunk: Chunk,
    assets: AssetRegistry,
    backend: B,
    notifications: NotificationQueue,
    max_notifications_per_frame: usize,
    frames: u64,
}

impl<B: RenderBackend> EngineState<B> {
    /// Wraps a constructed chunk and loads its GPU resources.
    ///
    /// # Arguments
    /// * `config` - Queue sizes and the starting camera position
    /// * `chunk` - The chunk to drive, not yet loaded
    /// * `assets` - Registry the chunk's blocks were resolved from
    /// * `backend` - Rendering collaborator, owned for the state's lifetime
    ///
    /// # Returns
    /// The loaded state, or the load error with nothing allocated on the backend
    pub fn new(
        config: &EngineConfig,
        mut chunk: Chunk,
        assets: AssetRegistry,
        mut backend: B,
    ) -> Result<Self, EngineError> {
        chunk.load(&mut backend, &assets)?;

        let [x, y, z] = config.camera_position;
        info!(
            "Engine ready: {} blocks, {} lights",
            chunk.block_count(),
            chunk.lights().len()
        );
        Ok(Self {
            camera_state: CameraState::new(Point3::new(x, y, z)),
            chunk,
            assets,
            backend,
            notifications: NotificationQueue::new(config.queue_capacity),
            max_notifications_per_frame: config.max_notifications_per_frame,
            frames: 0,
        })
    }

    /// Builds the demo scene from `config` and loads it onto `backend`.
    pub fn demo(config: &EngineConfig, backend: B) -> Result<Self, EngineError> {
        let assets = scene::build_assets();
        let chunk = scene::build_chunk(config, &assets)?;
        Self::new(config, chunk, assets, backend)
    }

    /// A producer handle for the inbound queue, usable from any thread.
    pub fn notification_sender(&self) -> NotificationSender {
        self.notifications.sender()
    }

    /// The driven chunk.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// The rendering backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the rendering backend, e.g. to collect submitted work.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame: notifications, recull, camera cell, render.
    pub fn frame(&mut self) -> FrameReport {
        let edits = self.process_notifications();
        let camera_cell = self.describe_camera_cell();
        let render = self
            .chunk
            .render(&mut self.backend, &self.camera_state.frame_uniforms());
        self.frames += 1;
        FrameReport {
            edits,
            render,
            camera_cell,
        }
    }

    /// Applies up to the configured number of pending notifications.
    ///
    /// # Returns
    /// How many scene commands changed the chunk
    fn process_notifications(&mut self) -> usize {
        let mut edits = 0;
        for text in self.notifications.drain(self.max_notifications_per_frame) {
            match Notification::parse(&text) {
                Notification::Command(command) => {
                    match command.apply(&mut self.chunk, &self.assets) {
                        Ok(()) => edits += 1,
                        Err(err) => warn!("Rejected {:?}: {}", command, err),
                    }
                }
                Notification::Message(message) => info!("Notification: {}", message),
            }
        }
        if edits > 0 {
            let hidden = self.chunk.cull();
            debug!("Reculled after {} edits, {} faces hidden", edits, hidden);
        }
        edits
    }

    /// Describes the cell containing the camera: `out of chunk`, `no block`, or
    /// the occupying block's diagnostic dump.
    pub fn describe_camera_cell(&self) -> String {
        let cell = self.camera_state.camera.block_position();
        if !self.chunk.contains_world(cell) {
            return "out of chunk".to_string();
        }
        match self.chunk.block_at_world(cell) {
            None => "no block".to_string(),
            Some(block) => {
                let dump = block
                    .debug_dump()
                    .unwrap_or_else(|| block.identity());
                debug!("Camera inside {}", dump);
                dump
            }
        }
    }

    /// Releases the chunk's GPU resources. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.chunk.is_loaded() {
            info!("Releasing chunk after {} frames", self.frames);
        }
        self.chunk.release(&mut self.backend);
    }
}

impl<B: RenderBackend> Drop for EngineState<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;
    use rendering::recording::{RecordingBackend, RenderCall};
    use voxels::block::block_side::BlockSide;

    fn demo() -> EngineState<RecordingBackend> {
        EngineState::demo(&EngineConfig::default(), RecordingBackend::new()).unwrap()
    }

    #[test]
    fn demo_renders_every_visible_face() {
        let mut state = demo();
        let report = state.frame();
        assert_eq!(report.edits, 0);
        assert_eq!(report.render.blocks, 16 * 2 * 16 + 3);
        // Floor: tops, bottoms and outer walls, minus three tops under lamps.
        // Lamps sit above the culled volume and keep all six faces.
        let floor = 256 + 256 + 4 * 16 * 2 - 3;
        assert_eq!(report.render.draws as usize, floor + 3 * 6);
    }

    #[test]
    fn commands_edit_and_recull() {
        let mut state = demo();
        let sender = state.notification_sender();
        assert!(sender.notify(r#"{"command":"place_block","x":0,"y":2,"z":0,"block":"container2"}"#));
        assert!(sender.notify("hello"));

        let report = state.frame();
        assert_eq!(report.edits, 1);
        let placed = state.chunk().get(Point3::new(0, 2, 0)).unwrap();
        assert_eq!(placed.block_type(), "container2");
        // The block below lost its top face.
        let below = state.chunk().get(Point3::new(0, 1, 0)).unwrap();
        assert!(!below.faces().contains(BlockSide::TOP));
    }

    #[test]
    fn rejected_commands_do_not_count() {
        let mut state = demo();
        let sender = state.notification_sender();
        sender.notify(r#"{"command":"remove_block","x":99,"y":0,"z":0}"#);
        assert_eq!(state.frame().edits, 0);
    }

    #[test]
    fn notifications_are_drained_in_batches() {
        let config = EngineConfig {
            max_notifications_per_frame: 2,
            ..EngineConfig::default()
        };
        let mut state = EngineState::demo(&config, RecordingBackend::new()).unwrap();
        let sender = state.notification_sender();
        for z in 0..3 {
            sender.notify(format!(r#"{{"command":"remove_block","x":0,"y":1,"z":{}}}"#, z));
        }
        assert_eq!(state.frame().edits, 2);
        assert_eq!(state.frame().edits, 1);
        assert_eq!(state.frame().edits, 0);
    }

    #[test]
    fn camera_cell_is_described() {
        let mut state = demo();
        assert_eq!(state.describe_camera_cell(), "no block");

        state.camera_state.translate(Vector3::new(0.0, -1.0, 0.0));
        let dump = state.describe_camera_cell();
        assert!(dump.starts_with("block container2"));
        assert!(dump.contains("absolute: (4, 1, 4)"));

        state.camera_state.translate(Vector3::new(-20.0, 0.0, 0.0));
        assert_eq!(state.describe_camera_cell(), "out of chunk");
    }

    #[test]
    fn block_placed_by_a_command_reports_its_dump() {
        let mut state = demo();
        let sender = state.notification_sender();
        assert!(sender.notify(r#"{"command":"place_block","x":4,"y":2,"z":4,"block":"container2"}"#));

        let report = state.frame();
        assert_eq!(report.edits, 1);
        assert!(report.camera_cell.starts_with("block container2"));
        assert!(report.camera_cell.contains("absolute: (4, 2, 4)"));
        assert!(report.camera_cell.contains("local: (4, 2, 4)"));
        // Above the culled volume, so every face stays visible.
        assert!(report.camera_cell.contains("faces: top bottom +z -z +x -x"));
    }

    #[test]
    fn shutdown_releases_everything_once() {
        let mut state = demo();
        state.frame();
        state.shutdown();
        assert_eq!(state.backend().live_buffers(), 0);
        let releases = state
            .backend()
            .count(|call| matches!(call, RenderCall::ReleaseBuffer(_)));
        state.shutdown();
        assert_eq!(
            state
                .backend()
                .count(|call| matches!(call, RenderCall::ReleaseBuffer(_))),
            releases
        );
        assert_eq!(state.frame().render, RenderStats::default());
    }
}
