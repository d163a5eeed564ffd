//! # Voxel Core
//!
//! Blocks, the chunk that stores them, and the pieces they share.
//!
//! ## Architecture
//!
//! * **coords**: Global, chunk-column and local coordinate conversions
//! * **block**: Block instances, face sides and block-type identifiers
//! * **capability**: Optional behaviours (lighting, diagnostics) attached to blocks and chunks
//! * **chunk**: A 16×256×16 column of blocks with population, culling, load and render
//! * **commands**: Text-encoded edits applied to a chunk between frames
//!
//! ## Data Flow
//!
//! 1. A chunk fills its generate volume through the asset registry
//! 2. Culling computes each block's visible faces
//! 3. Loading validates shaders, aggregates lights and creates GPU resources
//! 4. Rendering walks occupied cells in scan order and draws visible faces
//! 5. Release hands every GPU resource back

pub mod block;
pub mod capability;
pub mod chunk;
pub mod commands;
pub mod coords;
