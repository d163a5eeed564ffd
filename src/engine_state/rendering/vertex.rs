//! Vertex data structures and the shared unit-cube geometry.
//!
//! Every block is drawn from the same 36-vertex cube. Faces are laid out as
//! consecutive 6-vertex ranges in [`BlockSide`] order so that a single
//! `draw_triangle_range` call renders exactly one face.

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::AttributeSemantic;

/// A vertex of the unit cube.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    /// Object-space position, cube centered on the origin
    pub position: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

/// Number of floats in one [`CubeVertex`].
pub const FLOATS_PER_VERTEX: usize = 8;

/// Number of vertices in the unit cube.
pub const CUBE_VERTEX_COUNT: usize = 36;

const fn v(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> CubeVertex {
    CubeVertex {
        position,
        normal,
        tex_coords,
    }
}

/// The shared unit cube, counter-clockwise winding seen from outside.
///
/// Ranges: TOP [0,6), BOTTOM [6,12), FRONT (+Z) [12,18), BACK (-Z) [18,24),
/// RIGHT (+X) [24,30), LEFT (-X) [30,36).
#[rustfmt::skip]
pub const UNIT_CUBE: [CubeVertex; CUBE_VERTEX_COUNT] = [
    // TOP (+Y)
    v([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    v([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
    v([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    // BOTTOM (-Y)
    v([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    v([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    // FRONT (+Z)
    v([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    v([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
    v([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    // BACK (-Z)
    v([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
    v([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    v([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    v([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    // RIGHT (+X)
    v([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    v([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    v([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    v([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    // LEFT (-X)
    v([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
    v([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    v([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    v([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    v([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
];

impl CubeVertex {
    /// Byte size of one vertex.
    pub const STRIDE: u64 = std::mem::size_of::<CubeVertex>() as u64;

    /// Byte offset of `attribute` inside a vertex.
    pub fn offset_of(attribute: AttributeSemantic) -> u64 {
        match attribute {
            AttributeSemantic::Position => 0,
            AttributeSemantic::Normal => std::mem::size_of::<[f32; 3]>() as u64,
            AttributeSemantic::TexCoord => std::mem::size_of::<[f32; 6]>() as u64,
        }
    }

    /// The six vertices of `side`.
    pub fn face(side: BlockSide) -> &'static [CubeVertex] {
        let start = side.first_vertex() as usize;
        &UNIT_CUBE[start..start + 6]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn vertex_is_eight_floats() {
        assert_eq!(CubeVertex::STRIDE, (FLOATS_PER_VERTEX * 4) as u64);
        assert_eq!(bytemuck::cast_slice::<_, f32>(&UNIT_CUBE).len(), 288);
    }

    #[test]
    fn each_range_holds_its_own_face() {
        for side in BlockSide::all() {
            let expected: [f32; 3] = side.normal().into();
            for vertex in CubeVertex::face(side) {
                assert_eq!(vertex.normal, expected, "{:?}", side);
                let pos = Vector3::from(vertex.position);
                assert_eq!(pos.dot(side.normal()), 0.5, "{:?}", side);
            }
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for side in BlockSide::all() {
            for tri in CubeVertex::face(side).chunks(3) {
                let a = Vector3::from(tri[0].position);
                let b = Vector3::from(tri[1].position);
                let c = Vector3::from(tri[2].position);
                let winding = (b - a).cross(c - a);
                assert!(winding.dot(side.normal()) > 0.0, "{:?}", side);
            }
        }
    }
}
