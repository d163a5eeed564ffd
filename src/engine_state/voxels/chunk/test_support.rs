//! Fixtures shared by the chunk tests.

use cgmath::{Point3, Vector3};

use crate::engine_state::{
    lighting::PointLight,
    rendering::{AssetRegistry, ShaderHandle, ShaderProgram, TextureHandle},
    voxels::{
        block::{block_type, BlockInstance},
        capability::{Capability, CapabilityOwner, LightingCapability},
    },
};

use super::Chunk;

pub const NORMAL_SHADER: ShaderHandle = ShaderHandle(1);
pub const LAMP_SHADER: ShaderHandle = ShaderHandle(2);
pub const CONTAINER_DIFFUSE: TextureHandle = TextureHandle(10);
pub const CONTAINER_SPECULAR: TextureHandle = TextureHandle(11);

/// Lighting shader for everything, lamp shader for lamps, textures for containers.
pub fn assets() -> AssetRegistry {
    let mut assets = AssetRegistry::new();
    assets.register_shader(
        block_type::NORMAL,
        NORMAL_SHADER,
        ShaderProgram { name: "lighting".into(), emissive: false },
    );
    assets.register_shader(
        block_type::LAMP,
        LAMP_SHADER,
        ShaderProgram { name: "lamp".into(), emissive: true },
    );
    assets.register_diffuse_map(block_type::CONTAINER, CONTAINER_DIFFUSE);
    assets.register_specular_map(block_type::CONTAINER, CONTAINER_SPECULAR);
    assets
}

pub fn light_at(position: Point3<i32>, color: Vector3<f32>) -> PointLight {
    PointLight {
        position: position.cast().unwrap(),
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
        ambient: color * 0.8,
        diffuse: color,
        specular: Vector3::new(0.4, 0.0, 0.0),
    }
}

/// Puts a lamp emitting `color` at a local cell of `chunk`.
pub fn place_lamp(chunk: &mut Chunk, local: Point3<i32>, color: Vector3<f32>, assets: &AssetRegistry) {
    let world = Point3::new(
        local.x + chunk.origin().x,
        local.y,
        local.z + chunk.origin().z,
    );
    let mut lamp = BlockInstance::from_registry(world, block_type::LAMP, assets);
    lamp.attach(Capability::Lighting(LightingCapability::new(light_at(world, color))))
        .unwrap();
    chunk.set(local, lamp).unwrap();
}

/// A chunk at the origin whose generate volume has been emptied again.
pub fn empty_chunk(assets: &AssetRegistry) -> Chunk {
    let mut chunk = Chunk::new(cgmath::Vector2::new(0, 0), assets);
    for x in 0..16 {
        for y in 0..2 {
            for z in 0..16 {
                chunk.remove(Point3::new(x, y, z)).unwrap();
            }
        }
    }
    chunk
}
