//! # Demo Scene
//!
//! The asset registry and chunk the demo run starts from: a container floor lit
//! by three coloured lamps.

use cgmath::{Point3, Vector2, Vector3};
use log::info;

use super::{
    lighting::PointLight,
    rendering::{AssetRegistry, ShaderHandle, ShaderProgram, TextureHandle},
    voxels::{
        block::{block_type, BlockInstance},
        capability::{Capability, CapabilityError, CapabilityOwner, LightingCapability},
        chunk::{Chunk, ChunkError},
    },
};
use crate::config::EngineConfig;

/// Lit, textured block shader.
pub const LIGHTING_SHADER: ShaderHandle = ShaderHandle(1);
/// Unlit emitter shader.
pub const LAMP_SHADER: ShaderHandle = ShaderHandle(2);
/// Diffuse map of the container block.
pub const CONTAINER_DIFFUSE: TextureHandle = TextureHandle(1);
/// Specular map of the container block.
pub const CONTAINER_SPECULAR: TextureHandle = TextureHandle(2);

/// Attenuation shared by every demo lamp.
const LAMP_CONSTANT: f32 = 1.0;
const LAMP_LINEAR: f32 = 0.09;
const LAMP_QUADRATIC: f32 = 0.032;
/// Ambient contribution as a fraction of the lamp colour.
const LAMP_AMBIENT_FACTOR: f32 = 0.8;

/// Errors raised while building the demo scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The chunk rejected the configured volume or a lamp position
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// A capability could not be attached
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Registry with the lighting, lamp and container resources.
pub fn build_assets() -> AssetRegistry {
    let mut assets = AssetRegistry::new();
    assets.register_shader(
        block_type::NORMAL,
        LIGHTING_SHADER,
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

/// A lamp light of `color` at `position`.
pub fn lamp_light(position: Point3<i32>, color: Vector3<f32>, specular: Vector3<f32>) -> PointLight {
    PointLight {
        position: Point3::new(position.x as f32, position.y as f32, position.z as f32),
        constant: LAMP_CONSTANT,
        linear: LAMP_LINEAR,
        quadratic: LAMP_QUADRATIC,
        ambient: color * LAMP_AMBIENT_FACTOR,
        diffuse: color,
        specular,
    }
}

/// The demo chunk: configured generate volume and three lamps.
pub fn build_chunk(config: &EngineConfig, assets: &AssetRegistry) -> Result<Chunk, SceneError> {
    let [x, y, z] = config.generate_volume;
    let mut chunk = Chunk::with_generate_volume(
        Vector2::new(0, 0),
        Vector3::new(x, y, z),
        block_type::DEFAULT_POPULATION,
        assets,
    )?;

    let lamps = [
        (Point3::new(5, 2, 5), Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.4, 0.0, 0.0)),
        (Point3::new(9, 2, 5), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.4, 0.0, 0.0)),
        (Point3::new(9, 2, 9), Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 0.4)),
    ];
    for (local, color, specular) in lamps {
        let world = chunk.origin() + Vector3::new(local.x, local.y, local.z);
        let mut lamp = BlockInstance::from_registry(world, block_type::LAMP, assets);
        lamp.attach(Capability::Lighting(LightingCapability::new(lamp_light(
            world, color, specular,
        ))))?;
        chunk.set(local, lamp)?;
    }

    info!("Demo scene ready with {} blocks", chunk.block_count());
    Ok(chunk)
}
