//! Chunk load and teardown.
//!
//! Load runs in three steps:
//! 1. A scan over every occupied cell that resolves each block's shader, records
//!    the first-encounter order of shaders and packs the lights of emissive blocks.
//!    Nothing is sent to the backend until the whole scan has succeeded.
//! 2. GPU setup: the shared cube geometry, one vertex layout per shader, and the
//!    structured light buffer with its count uniform.
//! 3. Face culling over the generate sub-volume.

use cgmath::Point3;
use log::{debug, error, info};
use thiserror::Error;
use web_time::Instant;

use crate::engine_state::{
    lighting::PackedPointLight,
    rendering::{
        vertex::UNIT_CUBE, AssetRegistry, AttributeSemantic, CubeVertex, RenderBackend,
        ShaderHandle, UniformValue,
    },
};

use super::{Chunk, ChunkGpuResources};

/// Shader binding slot of the structured light buffer.
pub const LIGHT_BUFFER_BINDING: u32 = 0;

/// Uniform carrying the number of packed lights to non-emissive shaders.
pub const LIGHT_COUNT_UNIFORM: &str = "pLightNum";

/// Errors that abort [`Chunk::load`].
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    /// A block's shader is missing or unknown to the registry
    #[error("cannot resolve visual resources of {block_type:?} block at {position:?}")]
    ResourceResolution {
        /// Global position of the offending block
        position: Point3<i32>,
        /// Its block-type identifier
        block_type: String,
    },
    /// The chunk already holds GPU resources from an earlier load
    #[error("chunk is already loaded")]
    AlreadyLoaded,
}

/// Vertex layout work for one distinct shader.
#[derive(Debug)]
struct ShaderBinding {
    shader: ShaderHandle,
    with_tex_coords: bool,
    emissive: bool,
}

impl ShaderBinding {
    fn attributes(&self) -> impl Iterator<Item = AttributeSemantic> {
        let tex_coords = self.with_tex_coords.then_some(AttributeSemantic::TexCoord);
        [AttributeSemantic::Position, AttributeSemantic::Normal]
            .into_iter()
            .chain(tex_coords)
    }
}

impl Chunk {
    /// Uploads the chunk to `backend` and culls its faces.
    ///
    /// # Arguments
    /// * `backend` - Rendering collaborator receiving geometry, layouts and lights
    /// * `assets` - Registry used to validate every block's shader
    ///
    /// # Returns
    /// `ResourceResolution` for the first block in scan order whose shader cannot
    /// be resolved, in which case nothing was sent to the backend; `AlreadyLoaded`
    /// if called twice without [`Chunk::release`]
    pub fn load(
        &mut self,
        backend: &mut dyn RenderBackend,
        assets: &AssetRegistry,
    ) -> Result<(), LoadError> {
        if self.gpu.is_some() {
            return Err(LoadError::AlreadyLoaded);
        }

        let start = Instant::now();
        let (bindings, lights) = self.plan_load(assets)?;

        let geometry_buffer = backend.create_geometry_buffer();
        backend.upload_buffer(geometry_buffer, bytemuck::cast_slice(&UNIT_CUBE));

        let vertex_array = backend.create_vertex_array();
        for binding in &bindings {
            for attribute in binding.attributes() {
                backend.bind_vertex_layout(
                    binding.shader,
                    attribute,
                    CubeVertex::offset_of(attribute),
                    CubeVertex::STRIDE,
                );
            }
        }

        let light_buffer = backend.create_structured_buffer(LIGHT_BUFFER_BINDING);
        backend.upload_buffer(light_buffer, bytemuck::cast_slice(&lights));
        for binding in bindings.iter().filter(|binding| !binding.emissive) {
            backend.set_uniform(
                binding.shader,
                LIGHT_COUNT_UNIFORM,
                UniformValue::Int(lights.len() as i32),
            );
        }
        info!("Uploaded {} point lights", lights.len());

        self.lights = lights;
        self.bound_shaders = bindings.iter().map(|binding| binding.shader).collect();
        self.gpu = Some(ChunkGpuResources {
            geometry_buffer,
            vertex_array,
            light_buffer,
        });

        self.cull();

        info!(
            "Loaded chunk ({}, {}) with {} shaders in {:?}",
            self.location.x,
            self.location.y,
            self.bound_shaders.len(),
            start.elapsed()
        );
        Ok(())
    }

    /// Resolves shaders and gathers lights in scan order without touching the backend.
    fn plan_load(
        &self,
        assets: &AssetRegistry,
    ) -> Result<(Vec<ShaderBinding>, Vec<PackedPointLight>), LoadError> {
        let mut bindings: Vec<ShaderBinding> = Vec::new();
        let mut lights = Vec::new();

        for (_, block) in self.blocks() {
            let resolved = block
                .shader()
                .and_then(|shader| assets.program(shader).map(|program| (shader, program)));
            let Some((shader, program)) = resolved else {
                error!(
                    "Unable to resolve shader of {} block at {:?}",
                    block.block_type(),
                    block.location()
                );
                return Err(LoadError::ResourceResolution {
                    position: block.location(),
                    block_type: block.block_type().to_string(),
                });
            };

            if !bindings.iter().any(|binding| binding.shader == shader) {
                bindings.push(ShaderBinding {
                    shader,
                    with_tex_coords: block.visual().diffuse.is_some(),
                    emissive: program.emissive,
                });
            }

            if let Some(light) = block.light() {
                debug!("Adding light at {:?}", light.position);
                lights.push(light.pack());
            }
        }

        Ok((bindings, lights))
    }

    /// Releases the geometry buffer, vertex array and light buffer.
    ///
    /// Safe to call without a prior load and any number of times; each handle is
    /// released at most once.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        backend.release_buffer(gpu.geometry_buffer);
        backend.release_vertex_array(gpu.vertex_array);
        backend.release_buffer(gpu.light_buffer);
        self.bound_shaders.clear();
        info!(
            "Released GPU resources of chunk ({}, {})",
            self.location.x, self.location.y
        );
    }
}
