//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed `16 x 256 x 16` column of
//! optional [`BlockInstance`]s, together with its load-time face culling, light
//! aggregation and per-frame draw submission.
//!
//! ## Storage
//!
//! Blocks live in an arena of records addressed through a flat slot table:
//! - `slots`: one `u32` per cell, either an arena index or [`EMPTY`]
//! - `records`: the arena itself; removed records leave a hole that is reused
//! - `solid_array`: a bit vector (1 bit per cell) mirroring which slots are occupied
//!
//! Cells are indexed `(x * CHUNK_SIZE_Y + y) * CHUNK_SIZE_Z + z`, so walking the
//! set bits of `solid_array` in order visits blocks X outer, Y middle, Z inner.
//! That scan order is what load and render use.
//!
//! ### Performance Characteristics
//! - **Occupancy Check**: O(1) - Just check the bit in `solid_array`
//! - **Block Lookup**: O(1) - Slot table then arena
//! - **Scan**: proportional to the number of set bits, not the chunk volume

use bitvec::prelude::BitVec;
use cgmath::{EuclideanSpace, Point3, Vector2, Vector3};
use log::warn;
use thiserror::Error;

use super::{
    block::BlockInstance,
    capability::{CapabilityOwner, CapabilitySet},
    coords,
};
use crate::engine_state::{
    lighting::PackedPointLight,
    rendering::{AssetRegistry, BufferHandle, ShaderHandle, VertexArrayHandle},
};

mod chunk_creation;
mod chunk_culling;
pub mod chunk_iteration;
mod chunk_load;
mod chunk_render;
#[cfg(test)]
mod test_support;

pub use chunk_load::LoadError;
pub use chunk_render::RenderStats;

/// Width of a chunk along X, in blocks.
pub const CHUNK_SIZE_X: usize = 16;
/// Height of a chunk along Y, in blocks.
pub const CHUNK_SIZE_Y: usize = 256;
/// Depth of a chunk along Z, in blocks.
pub const CHUNK_SIZE_Z: usize = 16;
/// The total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Default extent of the sub-volume populated at construction.
pub const DEFAULT_GENERATE_VOLUME: Vector3<usize> = Vector3 { x: 16, y: 2, z: 16 };

/// Slot value of an empty cell.
const EMPTY: u32 = u32::MAX;

/// Errors raised by explicit chunk mutations.
#[derive(Debug, Error, PartialEq)]
pub enum ChunkError {
    /// A write addressed a cell outside the chunk
    #[error("cell {0:?} is outside the chunk")]
    OutOfBounds(Point3<i32>),
    /// The requested generate volume exceeds the chunk dimensions
    #[error("generate volume {0:?} exceeds the chunk dimensions")]
    GenerateVolumeTooLarge(Vector3<usize>),
    /// The block type has no shader usable by this chunk
    #[error("block type {0:?} has no shader bound to this chunk")]
    UnknownBlockType(String),
}

/// GPU objects owned by a loaded chunk, released together.
#[derive(Debug)]
struct ChunkGpuResources {
    geometry_buffer: BufferHandle,
    vertex_array: VertexArrayHandle,
    light_buffer: BufferHandle,
}

/// A fixed-size column of voxel blocks.
///
/// Only the generate sub-volume is populated at construction; callers may then
/// overwrite any in-bounds cell before [`Chunk::load`].
pub struct Chunk {
    /// Chunk-grid coordinate (X, Z)
    location: Vector2<i32>,
    /// Extent of the sub-volume populated at construction and culled at load
    generate_volume: Vector3<usize>,
    /// Arena of block records; `None` marks a reusable hole
    records: Vec<Option<BlockInstance>>,
    /// Holes in `records`
    free_records: Vec<u32>,
    /// Flat cell index to arena index, or [`EMPTY`]
    slots: Vec<u32>,
    /// A bit vector where each bit represents whether the corresponding cell is occupied.
    solid_array: BitVec,
    /// Packed lights of every emissive block, rebuilt at load
    lights: Vec<PackedPointLight>,
    /// Shaders whose vertex layouts were bound at load, in first-encounter order
    bound_shaders: Vec<ShaderHandle>,
    gpu: Option<ChunkGpuResources>,
    capabilities: CapabilitySet,
}

impl Chunk {
    /// Creates an empty chunk with no blocks at all.
    ///
    /// The chunk carries a diagnostic capability from the start.
    fn empty(location: Vector2<i32>, generate_volume: Vector3<usize>) -> Self {
        Self {
            location,
            generate_volume,
            records: Vec::new(),
            free_records: Vec::new(),
            slots: vec![EMPTY; CHUNK_VOLUME],
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
            lights: Vec::new(),
            bound_shaders: Vec::new(),
            gpu: None,
            capabilities: CapabilitySet::with_debug(),
        }
    }

    /// Flat cell index of a local position, `None` outside the chunk.
    fn index(local: Point3<i32>) -> Option<usize> {
        let in_range = |v: i32, size: usize| v >= 0 && (v as usize) < size;
        if in_range(local.x, CHUNK_SIZE_X)
            && in_range(local.y, CHUNK_SIZE_Y)
            && in_range(local.z, CHUNK_SIZE_Z)
        {
            Some((local.x as usize * CHUNK_SIZE_Y + local.y as usize) * CHUNK_SIZE_Z + local.z as usize)
        } else {
            None
        }
    }

    /// Local position of a flat cell index.
    fn position_of(index: usize) -> Point3<i32> {
        let z = index % CHUNK_SIZE_Z;
        let y = (index / CHUNK_SIZE_Z) % CHUNK_SIZE_Y;
        let x = index / (CHUNK_SIZE_Z * CHUNK_SIZE_Y);
        Point3::new(x as i32, y as i32, z as i32)
    }

    fn record(&self, index: usize) -> Option<&BlockInstance> {
        match self.slots[index] {
            EMPTY => None,
            record => self.records.get(record as usize).and_then(Option::as_ref),
        }
    }

    /// Chunk-grid coordinate.
    pub fn location(&self) -> Vector2<i32> {
        self.location
    }

    /// World-space origin of the chunk.
    pub fn origin(&self) -> Point3<i32> {
        coords::chunk_origin(self.location)
    }

    /// Extent of the generate sub-volume.
    pub fn generate_volume(&self) -> Vector3<usize> {
        self.generate_volume
    }

    /// Whether the local cell holds a block. Out-of-range cells are empty.
    pub fn is_occupied(&self, local: Point3<i32>) -> bool {
        Self::index(local).is_some_and(|index| self.solid_array[index])
    }

    /// The block at a local cell, `None` if empty or out of range.
    pub fn get(&self, local: Point3<i32>) -> Option<&BlockInstance> {
        Self::index(local).and_then(|index| self.record(index))
    }

    /// Mutable access to the block at a local cell.
    pub fn get_mut(&mut self, local: Point3<i32>) -> Option<&mut BlockInstance> {
        let index = Self::index(local)?;
        match self.slots[index] {
            EMPTY => None,
            record => self.records.get_mut(record as usize).and_then(Option::as_mut),
        }
    }

    /// The block at a global position, if the position falls inside this chunk.
    pub fn block_at_world(&self, global: Point3<i32>) -> Option<&BlockInstance> {
        self.get(coords::to_local(global, self.location))
    }

    /// Whether a global position falls inside this chunk's bounds.
    pub fn contains_world(&self, global: Point3<i32>) -> bool {
        Self::index(coords::to_local(global, self.location)).is_some()
    }

    /// Stores `block` at a local cell, replacing whatever was there.
    ///
    /// # Returns
    /// The replaced block, or `OutOfBounds` if the cell is outside the chunk
    pub fn set(
        &mut self,
        local: Point3<i32>,
        block: BlockInstance,
    ) -> Result<Option<BlockInstance>, ChunkError> {
        let index = Self::index(local).ok_or(ChunkError::OutOfBounds(local))?;

        if self.slots[index] != EMPTY {
            let record = self.slots[index] as usize;
            return Ok(self.records[record].replace(block));
        }

        let record = match self.free_records.pop() {
            Some(hole) => {
                self.records[hole as usize] = Some(block);
                hole
            }
            None => {
                self.records.push(Some(block));
                (self.records.len() - 1) as u32
            }
        };
        self.slots[index] = record;
        self.solid_array.set(index, true);
        Ok(None)
    }

    /// Empties a local cell.
    ///
    /// # Returns
    /// The removed block, or `OutOfBounds` if the cell is outside the chunk
    pub fn remove(&mut self, local: Point3<i32>) -> Result<Option<BlockInstance>, ChunkError> {
        let index = Self::index(local).ok_or(ChunkError::OutOfBounds(local))?;
        let record = std::mem::replace(&mut self.slots[index], EMPTY);
        if record == EMPTY {
            return Ok(None);
        }
        self.solid_array.set(index, false);
        self.free_records.push(record);
        Ok(self.records[record as usize].take())
    }

    /// Places a new block of `block_type` at a local cell.
    ///
    /// Once the chunk is loaded only block types whose shader had its vertex
    /// layout bound during load can be placed.
    ///
    /// # Returns
    /// The replaced block, `OutOfBounds`, or `UnknownBlockType`
    pub fn place(
        &mut self,
        local: Point3<i32>,
        block_type: &str,
        assets: &AssetRegistry,
    ) -> Result<Option<BlockInstance>, ChunkError> {
        let block = BlockInstance::from_registry(self.origin() + local.to_vec(), block_type, assets);
        let usable = match block.shader() {
            Some(shader) if self.gpu.is_some() => self.bound_shaders.contains(&shader),
            Some(shader) => assets.program(shader).is_some(),
            None => false,
        };
        if !usable {
            return Err(ChunkError::UnknownBlockType(block_type.to_string()));
        }
        self.set(local, block)
    }

    /// Number of occupied cells.
    pub fn block_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Packed lights aggregated by the last load.
    pub fn lights(&self) -> &[PackedPointLight] {
        &self.lights
    }

    /// Shaders bound during load, in first-encounter order.
    pub fn bound_shaders(&self) -> &[ShaderHandle] {
        &self.bound_shaders
    }

    /// Whether [`Chunk::load`] succeeded and the GPU objects are still live.
    pub fn is_loaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Dump from the chunk's diagnostic capability.
    pub fn debug_dump(&self) -> Option<String> {
        self.capabilities.debug().map(|debug| debug.dump(Some(self)))
    }
}

impl CapabilityOwner for Chunk {
    fn identity(&self) -> String {
        format!("chunk ({}, {})", self.location.x, self.location.y)
    }

    fn state(&self) -> Vec<(&'static str, String)> {
        vec![
            ("blocks", self.block_count().to_string()),
            ("lights", self.lights.len().to_string()),
            ("loaded", self.is_loaded().to_string()),
        ]
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn capabilities_mut(&mut self) -> &mut CapabilitySet {
        &mut self.capabilities
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        if let Some(gpu) = &self.gpu {
            warn!(
                "Chunk ({}, {}) dropped without release, leaking {:?}",
                self.location.x, self.location.y, gpu
            );
        }
    }
}
