//! # Chunk Creation Module
//!
//! Populates a new chunk's generate sub-volume. The `ChunkCreationIterator`
//! walks the sub-volume in scan order (X outer, Y middle, Z inner) and places one
//! block per push, so the arena ends up in the same order load and render visit it.

use cgmath::{Point3, Vector2, Vector3};
use log::info;
use web_time::Instant;

use crate::engine_state::{
    rendering::AssetRegistry,
    voxels::block::{block_type, BlockInstance},
};

use super::{Chunk, ChunkError, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, DEFAULT_GENERATE_VOLUME};

/// A builder that fills a chunk's generate sub-volume cell by cell.
pub struct ChunkCreationIterator<'a> {
    /// The chunk being populated
    chunk: Chunk,
    /// Registry block types are resolved against
    assets: &'a AssetRegistry,
    /// Next cell to fill, local coordinates
    local_x: usize,
    local_y: usize,
    local_z: usize,
    /// Set once every cell of the sub-volume has been pushed
    done: bool,
}

impl<'a> ChunkCreationIterator<'a> {
    /// Starts populating an empty chunk at `location`.
    pub fn new(location: Vector2<i32>, generate_volume: Vector3<usize>, assets: &'a AssetRegistry) -> Self {
        let done = generate_volume.x == 0 || generate_volume.y == 0 || generate_volume.z == 0;
        Self {
            chunk: Chunk::empty(location, generate_volume),
            assets,
            local_x: 0,
            local_y: 0,
            local_z: 0,
            done,
        }
    }

    /// Places a block of `block_type` in the next cell.
    ///
    /// # Returns
    /// `false` once the sub-volume is full; the block is then not placed
    pub fn push_block_type(&mut self, block_type: &str) -> bool {
        if self.done {
            return false;
        }

        let local = Point3::new(self.local_x as i32, self.local_y as i32, self.local_z as i32);
        let origin = self.chunk.origin();
        let world = Point3::new(origin.x + local.x, local.y, origin.z + local.z);
        let block = BlockInstance::from_registry(world, block_type, self.assets);

        // The cursor never leaves the generate volume, which is within bounds.
        if self.chunk.set(local, block).is_err() {
            self.done = true;
            return false;
        }

        self.advance();
        true
    }

    fn advance(&mut self) {
        let volume = self.chunk.generate_volume;
        self.local_z += 1;
        if self.local_z == volume.z {
            self.local_z = 0;
            self.local_y += 1;
            if self.local_y == volume.y {
                self.local_y = 0;
                self.local_x += 1;
                if self.local_x == volume.x {
                    self.done = true;
                }
            }
        }
    }

    /// Finishes population and hands back the chunk.
    pub fn return_chunk(self) -> Chunk {
        self.chunk
    }
}

impl Chunk {
    /// Creates a chunk at `location` with the default generate volume filled
    /// with the default block type.
    ///
    /// # Arguments
    /// * `location` - Chunk-grid coordinate (X, Z)
    /// * `assets` - Registry block types are resolved against
    pub fn new(location: Vector2<i32>, assets: &AssetRegistry) -> Self {
        Self::populate(location, DEFAULT_GENERATE_VOLUME, block_type::DEFAULT_POPULATION, assets)
    }

    /// Creates a chunk whose generate sub-volume has a custom extent and block type.
    ///
    /// # Arguments
    /// * `location` - Chunk-grid coordinate (X, Z)
    /// * `generate_volume` - Extent of the populated sub-volume, anchored at the local origin
    /// * `block_type` - Block type every generated cell receives
    /// * `assets` - Registry block types are resolved against
    ///
    /// # Returns
    /// The chunk, or `GenerateVolumeTooLarge` if the extent exceeds the chunk
    pub fn with_generate_volume(
        location: Vector2<i32>,
        generate_volume: Vector3<usize>,
        block_type: &str,
        assets: &AssetRegistry,
    ) -> Result<Self, ChunkError> {
        if generate_volume.x > CHUNK_SIZE_X
            || generate_volume.y > CHUNK_SIZE_Y
            || generate_volume.z > CHUNK_SIZE_Z
        {
            return Err(ChunkError::GenerateVolumeTooLarge(generate_volume));
        }

        Ok(Self::populate(location, generate_volume, block_type, assets))
    }

    fn populate(
        location: Vector2<i32>,
        generate_volume: Vector3<usize>,
        block_type: &str,
        assets: &AssetRegistry,
    ) -> Self {
        let start = Instant::now();
        let mut cci = ChunkCreationIterator::new(location, generate_volume, assets);
        while cci.push_block_type(block_type) {}
        let chunk = cci.return_chunk();
        info!(
            "Constructed chunk ({}, {}) with {} blocks in {:?}",
            location.x,
            location.y,
            chunk.block_count(),
            start.elapsed()
        );
        chunk
    }
}
