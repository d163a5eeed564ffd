//! Asset registry: resolves block-type identifiers to visual resources.
//!
//! The registry is owned by the caller and passed into chunk construction and
//! loading, so nothing about shader or texture lookup lives in process-wide state.

use std::collections::HashMap;

use log::debug;

use crate::engine_state::voxels::block::block_type;

use super::{ShaderHandle, TextureHandle};

/// Block type whose shader is used when a block type has none of its own.
pub const DEFAULT_BLOCK_TYPE: &str = block_type::NORMAL;

/// A shader/material known to the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderProgram {
    /// Human-readable name, used in diagnostics
    pub name: String,
    /// Whether the shader renders light emitters instead of consuming the light list
    pub emissive: bool,
}

/// Renderable resources bound to one block.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualAssignment {
    /// Block-type identifier the assignment was resolved from
    pub block_type: String,
    /// Shader/material, `None` if neither the block type nor the default resolved
    pub shader: Option<ShaderHandle>,
    /// Diffuse map, sampled from texture unit 0
    pub diffuse: Option<TextureHandle>,
    /// Specular map, sampled from texture unit 1
    pub specular: Option<TextureHandle>,
}

/// Owned lookup tables from block-type identifiers to visual resources.
///
/// # Examples
///
/// ```
/// use voxel_chunk::engine_state::rendering::*;
///
/// let mut assets = AssetRegistry::new();
/// assets.register_shader("blockNormal", ShaderHandle(1), ShaderProgram { name: "lighting".into(), emissive: false });
/// assets.register_diffuse_map("container2", TextureHandle(7));
///
/// let visual = assets.assign("container2");
/// assert_eq!(visual.shader, Some(ShaderHandle(1)));
/// assert_eq!(visual.diffuse, Some(TextureHandle(7)));
/// ```
#[derive(Debug, Default)]
pub struct AssetRegistry {
    shaders_by_block: HashMap<String, ShaderHandle>,
    programs: HashMap<ShaderHandle, ShaderProgram>,
    diffuse_maps: HashMap<String, TextureHandle>,
    specular_maps: HashMap<String, TextureHandle>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `shader` as the material for `block_type`.
    ///
    /// Registering the same handle for several block types shares one program.
    pub fn register_shader(
        &mut self,
        block_type: impl Into<String>,
        shader: ShaderHandle,
        program: ShaderProgram,
    ) {
        let block_type = block_type.into();
        debug!("Registered shader {:?} ({}) for {}", shader, program.name, block_type);
        self.shaders_by_block.insert(block_type, shader);
        self.programs.insert(shader, program);
    }

    /// Registers a diffuse map for `block_type`.
    pub fn register_diffuse_map(&mut self, block_type: impl Into<String>, texture: TextureHandle) {
        self.diffuse_maps.insert(block_type.into(), texture);
    }

    /// Registers a specular map for `block_type`.
    pub fn register_specular_map(&mut self, block_type: impl Into<String>, texture: TextureHandle) {
        self.specular_maps.insert(block_type.into(), texture);
    }

    /// Resolves the visual resources of `block_type`.
    ///
    /// Block types without a shader of their own fall back to the default block
    /// type's shader. Textures never fall back.
    pub fn assign(&self, block_type: &str) -> VisualAssignment {
        let shader = self
            .shaders_by_block
            .get(block_type)
            .or_else(|| self.shaders_by_block.get(DEFAULT_BLOCK_TYPE))
            .copied();

        VisualAssignment {
            block_type: block_type.to_string(),
            shader,
            diffuse: self.diffuse_maps.get(block_type).copied(),
            specular: self.specular_maps.get(block_type).copied(),
        }
    }

    /// Looks up the program behind a shader handle.
    pub fn program(&self, shader: ShaderHandle) -> Option<&ShaderProgram> {
        self.programs.get(&shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        let mut assets = AssetRegistry::new();
        assets.register_shader(
            DEFAULT_BLOCK_TYPE,
            ShaderHandle(1),
            ShaderProgram { name: "lighting".into(), emissive: false },
        );
        assets.register_shader(
            "blockLamp",
            ShaderHandle(2),
            ShaderProgram { name: "lamp".into(), emissive: true },
        );
        assets.register_diffuse_map("container2", TextureHandle(10));
        assets.register_specular_map("container2", TextureHandle(11));
        assets
    }

    #[test]
    fn unregistered_block_type_falls_back_to_default_shader() {
        let visual = registry().assign("container2");
        assert_eq!(visual.shader, Some(ShaderHandle(1)));
        assert_eq!(visual.diffuse, Some(TextureHandle(10)));
        assert_eq!(visual.specular, Some(TextureHandle(11)));
    }

    #[test]
    fn registered_block_type_uses_its_own_shader_without_textures() {
        let visual = registry().assign("blockLamp");
        assert_eq!(visual.shader, Some(ShaderHandle(2)));
        assert_eq!(visual.diffuse, None);
        assert!(registry().program(ShaderHandle(2)).unwrap().emissive);
    }

    #[test]
    fn missing_default_leaves_shader_unresolved() {
        let assets = AssetRegistry::new();
        assert_eq!(assets.assign("anything").shader, None);
    }
}
