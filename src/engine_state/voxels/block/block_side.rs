//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the visibility mask the
//! chunk's culling pass maintains over them.

use std::fmt;

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the face's bit in a [`FaceMask`] and as its slot in
/// the shared unit-cube geometry: face `n` occupies vertices `[6n, 6n + 6)`.
///
/// The order is: [TOP, BOTTOM, FRONT, BACK, RIGHT, LEFT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The front face (facing positive Z)
    FRONT = 2,

    /// The back face (facing negative Z)
    BACK = 3,

    /// The right face (facing positive X)
    RIGHT = 4,

    /// The left face (facing negative X)
    LEFT = 5,
}

/// Number of vertices each face occupies in the unit-cube geometry.
pub const VERTICES_PER_FACE: u32 = 6;

impl BlockSide {
    /// Returns an array containing all six block faces in geometry order.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
        ]
    }

    /// Offset from a block to the neighbor this face touches.
    pub fn neighbor_offset(self) -> Vector3<i32> {
        match self {
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
        }
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.neighbor_offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// The face on the other side of the same plane.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
        }
    }

    /// First vertex of this face inside the unit-cube geometry buffer.
    pub fn first_vertex(self) -> u32 {
        self as u32 * VERTICES_PER_FACE
    }

    /// Short lowercase name used in diagnostic output.
    pub fn name(self) -> &'static str {
        match self {
            BlockSide::TOP => "top",
            BlockSide::BOTTOM => "bottom",
            BlockSide::FRONT => "+z",
            BlockSide::BACK => "-z",
            BlockSide::RIGHT => "+x",
            BlockSide::LEFT => "-x",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Visibility bitmask over the six [`BlockSide`]s.
///
/// A set bit means the face is visible and will be drawn.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct FaceMask(u8);

impl FaceMask {
    /// Every face visible.
    pub const ALL: FaceMask = FaceMask(0b11_1111);
    /// Every face hidden.
    pub const NONE: FaceMask = FaceMask(0);

    /// Whether `side` is visible.
    pub fn contains(self, side: BlockSide) -> bool {
        self.0 & side.bit() != 0
    }

    /// Marks `side` hidden.
    pub fn hide(&mut self, side: BlockSide) {
        self.0 &= !side.bit();
    }

    /// Number of visible faces.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the visible faces in geometry order.
    pub fn visible(self) -> impl Iterator<Item = BlockSide> {
        BlockSide::all().into_iter().filter(move |side| self.contains(*side))
    }

    /// Raw bits, lowest bit is [`BlockSide::TOP`].
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl Default for FaceMask {
    fn default() -> Self {
        FaceMask::ALL
    }
}

impl fmt::Display for FaceMask {
    /// Space-separated names of the visible faces, e.g. `top +z -x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.visible().map(BlockSide::name).collect();
        write!(f, "{}", names.join(" "))
    }
}
