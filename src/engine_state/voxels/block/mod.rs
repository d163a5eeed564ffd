//! # Block Module
//!
//! This module provides the placed voxel, [`BlockInstance`], together with block
//! face handling and the well-known block-type identifiers.

use cgmath::{Point3, Vector2};

use crate::engine_state::{
    lighting::PointLight,
    rendering::{AssetRegistry, ShaderHandle, VisualAssignment},
};

use self::block_side::FaceMask;
use super::{
    capability::{CapabilityOwner, CapabilitySet, Placeable},
    coords,
};

pub mod block_side;
pub mod block_type;

/// A single voxel placed in the world.
///
/// The visual assignment is resolved once at construction and never changes.
/// The face mask starts fully visible and is only rewritten by the owning
/// chunk's culling pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockInstance {
    location: Point3<i32>,
    visual: VisualAssignment,
    faces: FaceMask,
    capabilities: CapabilitySet,
}

impl BlockInstance {
    /// Creates a block from an already resolved visual assignment.
    ///
    /// Every block starts with a diagnostic capability attached.
    ///
    /// # Arguments
    /// * `location` - Global block position
    /// * `visual` - Renderable resources for the block
    pub fn new(location: Point3<i32>, visual: VisualAssignment) -> Self {
        Self {
            location,
            visual,
            faces: FaceMask::ALL,
            capabilities: CapabilitySet::with_debug(),
        }
    }

    /// Creates a block by resolving `block_type` through `assets`.
    ///
    /// # Arguments
    /// * `location` - Global block position
    /// * `block_type` - Block-type identifier
    /// * `assets` - Registry the identifier is resolved against
    pub fn from_registry(location: Point3<i32>, block_type: &str, assets: &AssetRegistry) -> Self {
        Self::new(location, assets.assign(block_type))
    }

    /// Global block position.
    pub fn location(&self) -> Point3<i32> {
        self.location
    }

    /// Chunk column of the block, `(x mod 16, z mod 16)`.
    pub fn chunk_location(&self) -> Vector2<i32> {
        coords::to_chunk_column(self.location)
    }

    /// Position relative to the chunk column's origin.
    pub fn local_location(&self) -> Point3<i32> {
        coords::to_local(self.location, self.chunk_location())
    }

    /// Resolved renderable resources.
    pub fn visual(&self) -> &VisualAssignment {
        &self.visual
    }

    /// Block-type identifier the block was created from.
    pub fn block_type(&self) -> &str {
        &self.visual.block_type
    }

    /// Shader of the block, `None` if it could not be resolved.
    pub fn shader(&self) -> Option<ShaderHandle> {
        self.visual.shader
    }

    /// Faces currently visible.
    pub fn faces(&self) -> FaceMask {
        self.faces
    }

    pub(crate) fn set_faces(&mut self, faces: FaceMask) {
        self.faces = faces;
    }

    /// The light this block emits, if it carries a lighting capability.
    pub fn light(&self) -> Option<&PointLight> {
        self.capabilities.lighting().map(|lighting| lighting.light())
    }

    /// Dump from the block's diagnostic capability.
    pub fn debug_dump(&self) -> Option<String> {
        self.capabilities
            .debug()
            .map(|debug| debug.dump(Some(self)))
    }
}

impl Placeable for BlockInstance {
    fn location(&self) -> Point3<i32> {
        self.location
    }

    fn chunk_location(&self) -> Vector2<i32> {
        BlockInstance::chunk_location(self)
    }

    fn local_location(&self) -> Point3<i32> {
        BlockInstance::local_location(self)
    }
}

impl CapabilityOwner for BlockInstance {
    fn identity(&self) -> String {
        format!("block {}", self.visual.block_type)
    }

    fn state(&self) -> Vec<(&'static str, String)> {
        let local = self.local_location();
        let chunk = self.chunk_location();
        vec![
            (
                "absolute",
                format!("({}, {}, {})", self.location.x, self.location.y, self.location.z),
            ),
            ("chunk", format!("({}, {})", chunk.x, chunk.y)),
            ("local", format!("({}, {}, {})", local.x, local.y, local.z)),
            ("faces", self.faces.to_string()),
        ]
    }

    fn as_placeable(&self) -> Option<&dyn Placeable> {
        Some(self)
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn capabilities_mut(&mut self) -> &mut CapabilitySet {
        &mut self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::ShaderProgram,
        voxels::capability::{Capability, LightingCapability},
    };
    use block_side::BlockSide;
    use cgmath::Vector3;

    fn assets() -> AssetRegistry {
        let mut assets = AssetRegistry::new();
        assets.register_shader(
            block_type::NORMAL,
            ShaderHandle(1),
            ShaderProgram { name: "lighting".into(), emissive: false },
        );
        assets
    }

    #[test]
    fn new_block_has_every_face_visible() {
        let block = BlockInstance::from_registry(Point3::new(1, 0, 1), block_type::CONTAINER, &assets());
        assert_eq!(block.faces(), FaceMask::ALL);
        assert_eq!(block.shader(), Some(ShaderHandle(1)));
        assert!(block.light().is_none());
    }

    #[test]
    fn derived_locations_follow_coordinate_model() {
        let block = BlockInstance::from_registry(Point3::new(21, 4, 3), block_type::CONTAINER, &assets());
        assert_eq!(block.chunk_location(), Vector2::new(5, 3));
        assert_eq!(block.local_location(), Point3::new(21 - 80, 4, 3 - 48));
    }

    #[test]
    fn lighting_attaches_to_a_block() {
        let mut block = BlockInstance::from_registry(Point3::new(5, 2, 5), block_type::LAMP, &assets());
        let light = PointLight {
            position: cgmath::Point3::new(5.0, 2.0, 5.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            ambient: Vector3::new(0.8, 0.0, 0.0),
            diffuse: Vector3::new(1.0, 0.0, 0.0),
            specular: Vector3::new(0.4, 0.0, 0.0),
        };
        block
            .attach(Capability::Lighting(LightingCapability::new(light)))
            .unwrap();

        assert_eq!(block.light(), Some(&light));
        assert_eq!(
            block.capabilities().lighting().unwrap().cell(),
            Some(Point3::new(5, 2, 5))
        );
    }

    #[test]
    fn debug_dump_reports_positions_and_faces() {
        let mut block = BlockInstance::from_registry(Point3::new(2, 1, 3), block_type::CONTAINER, &assets());
        let mut faces = FaceMask::ALL;
        faces.hide(BlockSide::TOP);
        block.set_faces(faces);

        let dump = block.debug_dump().unwrap();
        assert!(dump.starts_with("block container2"));
        assert!(dump.contains("absolute: (2, 1, 3)"));
        assert!(dump.contains("chunk: (2, 3)"));
        assert!(dump.contains("faces: bottom +z -z +x -x"));
    }

    #[test]
    fn constructed_blocks_carry_a_debug_capability() {
        let block = BlockInstance::from_registry(Point3::new(0, 0, 0), block_type::LAMP, &assets());
        assert_eq!(block.capabilities().len(), 1);
        assert!(block.capabilities().debug().is_some());
        assert!(block
            .debug_dump()
            .unwrap()
            .starts_with("block blockLamp\n  absolute: (0, 0, 0)"));
    }
}
