//! # Chunk Iteration Module
//!
//! This module provides an iterator over the occupied cells of a chunk in scan
//! order (X outer, Y middle, Z inner).
//!
//! ## Memory-Aware Iteration
//!
//! The `ChunkBlockIterator` walks the set bits of the chunk's `solid_array`, so
//! empty cells are skipped a machine word at a time and only occupied slots are
//! dereferenced into the block arena.

use bitvec::{order::Lsb0, slice::IterOnes};
use cgmath::Point3;

use crate::engine_state::voxels::block::BlockInstance;

use super::Chunk;

/// An iterator over all occupied cells of a chunk, yielding `(local, block)`.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Remaining set bits of the occupancy array
    ones: IterOnes<'a, usize, Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned before the first occupied cell.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            ones: chunk_ref.solid_array.iter_ones(),
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<i32>, &'a BlockInstance);

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunk_ref;
        self.ones
            .by_ref()
            .find_map(|index| chunk.record(index).map(|block| (Chunk::position_of(index), block)))
    }
}

impl Chunk {
    /// Iterates occupied cells in scan order.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assets, empty_chunk};
    use super::*;
    use crate::engine_state::voxels::block::block_type;

    #[test]
    fn scan_order_is_x_then_y_then_z() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        for local in [
            Point3::new(1, 0, 0),
            Point3::new(0, 1, 0),
            Point3::new(0, 0, 1),
            Point3::new(0, 0, 0),
        ] {
            chunk.place(local, block_type::CONTAINER, &assets).unwrap();
        }

        let order: Vec<Point3<i32>> = chunk.blocks().map(|(local, _)| local).collect();
        assert_eq!(
            order,
            vec![
                Point3::new(0, 0, 0),
                Point3::new(0, 0, 1),
                Point3::new(0, 1, 0),
                Point3::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn iteration_yields_every_generated_block() {
        let chunk = Chunk::new(cgmath::Vector2::new(0, 0), &assets());
        assert_eq!(chunk.blocks().count(), 512);
    }
}
