//! # Scene Commands
//!
//! JSON edits to a loaded chunk, received as text over the notification channel.
//!
//! ```json
//! {"command": "place_block", "x": 3, "y": 2, "z": 3, "block": "container2"}
//! {"command": "remove_block", "x": 3, "y": 2, "z": 3}
//! ```
//!
//! Coordinates are chunk-local. Anything that does not parse as a command is a
//! plain notification.

use cgmath::Point3;
use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::engine_state::rendering::AssetRegistry;

use super::chunk::{Chunk, ChunkError};

/// Errors raised while applying a scene command.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// The chunk rejected the edit
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// One edit to the chunk.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SceneCommand {
    /// Put a block of type `block` at a local cell, replacing any block there
    PlaceBlock {
        /// Local X
        x: i32,
        /// Local Y
        y: i32,
        /// Local Z
        z: i32,
        /// Block-type identifier
        block: String,
    },
    /// Empty a local cell
    RemoveBlock {
        /// Local X
        x: i32,
        /// Local Y
        y: i32,
        /// Local Z
        z: i32,
    },
}

/// An inbound text message, classified.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A well-formed scene command
    Command(SceneCommand),
    /// Anything else, kept verbatim
    Message(String),
}

impl Notification {
    /// Classifies raw text as a command or a plain message.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<SceneCommand>(text) {
            Ok(command) => Notification::Command(command),
            Err(_) => Notification::Message(text.to_string()),
        }
    }
}

impl SceneCommand {
    /// Local cell the command addresses.
    pub fn cell(&self) -> Point3<i32> {
        match self {
            SceneCommand::PlaceBlock { x, y, z, .. } | SceneCommand::RemoveBlock { x, y, z } => {
                Point3::new(*x, *y, *z)
            }
        }
    }

    /// Applies the edit to `chunk`. Face masks are left for the caller to recull.
    pub fn apply(&self, chunk: &mut Chunk, assets: &AssetRegistry) -> Result<(), CommandError> {
        let cell = self.cell();
        match self {
            SceneCommand::PlaceBlock { block, .. } => {
                chunk.place(cell, block, assets)?;
                info!("Placed {} at {:?}", block, cell);
            }
            SceneCommand::RemoveBlock { .. } => {
                if let Some(removed) = chunk.remove(cell)? {
                    info!("Removed {} at {:?}", removed.block_type(), cell);
                }
            }
        }
        Ok(())
    }
}
