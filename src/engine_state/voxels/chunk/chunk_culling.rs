//! Face culling over the generate sub-volume.
//!
//! A face is hidden iff the cell on that side is inside the chunk and occupied.
//! Faces on the chunk boundary always stay visible. Masks are recomputed from
//! scratch on every pass.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::block::block_side::{BlockSide, FaceMask};

use super::Chunk;

impl Chunk {
    /// Visibility mask for a block at `local` given current occupancy.
    fn visible_faces(&self, local: Point3<i32>) -> FaceMask {
        BlockSide::all()
            .into_iter()
            .filter(|side| self.is_occupied(local + side.neighbor_offset()))
            .fold(FaceMask::ALL, |mut mask, side| {
                mask.hide(side);
                mask
            })
    }

    /// Recomputes the face mask of every block in the generate sub-volume.
    ///
    /// Blocks placed outside the sub-volume keep whatever mask they had.
    ///
    /// # Returns
    /// Number of hidden faces across the culled blocks
    pub fn cull(&mut self) -> u32 {
        let start = Instant::now();
        let volume = self.generate_volume;
        let mut hidden = 0;

        for x in 0..volume.x as i32 {
            for y in 0..volume.y as i32 {
                for z in 0..volume.z as i32 {
                    let local = Point3::new(x, y, z);
                    if !self.is_occupied(local) {
                        continue;
                    }
                    let faces = self.visible_faces(local);
                    hidden += 6 - faces.count();
                    if let Some(block) = self.get_mut(local) {
                        block.set_faces(faces);
                    }
                }
            }
        }

        debug!("Culled {} faces in {:?}", hidden, start.elapsed());
        hidden
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assets, empty_chunk};
    use super::*;
    use crate::engine_state::voxels::block::block_type;
    use proptest::prelude::*;

    #[test]
    fn isolated_block_keeps_every_face() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        chunk.place(Point3::new(3, 1, 3), block_type::CONTAINER, &assets).unwrap();
        chunk.cull();
        assert_eq!(chunk.get(Point3::new(3, 1, 3)).unwrap().faces(), FaceMask::ALL);
    }

    #[test]
    fn x_neighbours_hide_exactly_their_shared_faces() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        chunk.place(Point3::new(0, 0, 0), block_type::CONTAINER, &assets).unwrap();
        chunk.place(Point3::new(1, 0, 0), block_type::CONTAINER, &assets).unwrap();
        assert_eq!(chunk.cull(), 2);

        let left = chunk.get(Point3::new(0, 0, 0)).unwrap().faces();
        let right = chunk.get(Point3::new(1, 0, 0)).unwrap().faces();
        assert!(!left.contains(BlockSide::RIGHT));
        assert!(!right.contains(BlockSide::LEFT));
        assert_eq!(left.count(), 5);
        assert_eq!(right.count(), 5);
    }

    #[test]
    fn full_generate_volume_shows_only_outer_shell() {
        let assets = assets();
        let mut chunk = Chunk::new(cgmath::Vector2::new(0, 0), &assets);
        chunk.cull();

        let corner = chunk.get(Point3::new(0, 0, 0)).unwrap().faces();
        assert_eq!(corner.to_string(), "bottom -z -x");

        let middle_top = chunk.get(Point3::new(7, 1, 7)).unwrap().faces();
        assert_eq!(middle_top.to_string(), "top");
    }

    #[test]
    fn recull_restores_faces_after_removal() {
        let assets = assets();
        let mut chunk = Chunk::new(cgmath::Vector2::new(0, 0), &assets);
        chunk.cull();
        chunk.remove(Point3::new(5, 1, 5)).unwrap();
        chunk.cull();
        let below = chunk.get(Point3::new(5, 0, 5)).unwrap().faces();
        assert!(below.contains(BlockSide::TOP));
    }

    #[test]
    fn blocks_outside_generate_volume_are_not_culled() {
        let assets = assets();
        let mut chunk = Chunk::new(cgmath::Vector2::new(0, 0), &assets);
        chunk.place(Point3::new(0, 2, 0), block_type::CONTAINER, &assets).unwrap();
        chunk.cull();
        assert_eq!(chunk.get(Point3::new(0, 2, 0)).unwrap().faces(), FaceMask::ALL);
        assert!(!chunk.get(Point3::new(0, 1, 0)).unwrap().faces().contains(BlockSide::TOP));
    }

    proptest! {
        #[test]
        fn hidden_faces_always_face_an_occupied_cell(
            cells in proptest::collection::vec((0i32..16, 0i32..2, 0i32..16), 0..64)
        ) {
            let assets = assets();
            let mut chunk = empty_chunk(&assets);
            for (x, y, z) in &cells {
                chunk.place(Point3::new(*x, *y, *z), block_type::CONTAINER, &assets).unwrap();
            }
            chunk.cull();

            for (local, block) in chunk.blocks() {
                for side in BlockSide::all() {
                    let neighbour = local + side.neighbor_offset();
                    prop_assert_eq!(block.faces().contains(side), !chunk.is_occupied(neighbour));
                }
            }
        }
    }
}
