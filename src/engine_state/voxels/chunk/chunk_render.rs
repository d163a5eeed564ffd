//! Per-frame draw submission.
//!
//! Blocks are visited in scan order. The active shader is carried through the
//! walk as a fold accumulator that starts empty every frame, so shared per-shader
//! uniforms are pushed once per contiguous run of blocks using the same shader.

use cgmath::{Matrix4, Vector3};
use log::debug;

use crate::engine_state::{
    rendering::{
        FrameUniforms, RenderBackend, ShaderHandle, TextureUnit, UniformValue,
    },
    voxels::block::{block_side::VERTICES_PER_FACE, BlockInstance},
};

use super::Chunk;

/// Diffuse map sampler unit pushed as `material.diffuse`.
const DIFFUSE_UNIT: i32 = TextureUnit::Diffuse as i32;
/// Specular map sampler unit pushed as `material.specular`.
const SPECULAR_UNIT: i32 = TextureUnit::Specular as i32;
/// Specular exponent of every textured block.
const MATERIAL_SHININESS: f32 = 32.0;

/// Counters for one [`Chunk::render`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Blocks visited
    pub blocks: u32,
    /// Face draws issued
    pub draws: u32,
    /// Shader changes
    pub shader_switches: u32,
}

/// Fold state of a render walk.
#[derive(Default)]
struct RenderPass {
    current_shader: Option<ShaderHandle>,
    stats: RenderStats,
}

impl Chunk {
    /// Submits every visible face of every block to `backend`.
    ///
    /// Does nothing before [`Chunk::load`] or after [`Chunk::release`].
    ///
    /// # Arguments
    /// * `backend` - Rendering collaborator receiving state changes and draws
    /// * `frame` - View, projection and viewer position of this frame
    pub fn render(&self, backend: &mut dyn RenderBackend, frame: &FrameUniforms) -> RenderStats {
        if self.gpu.is_none() {
            debug!("Skipping render of unloaded chunk");
            return RenderStats::default();
        }

        let pass = self
            .blocks()
            .fold(RenderPass::default(), |pass, (_, block)| {
                render_block(pass, block, backend, frame)
            });

        debug!(
            "Rendered {} blocks with {} draws and {} shader switches",
            pass.stats.blocks, pass.stats.draws, pass.stats.shader_switches
        );
        pass.stats
    }
}

fn render_block(
    mut pass: RenderPass,
    block: &BlockInstance,
    backend: &mut dyn RenderBackend,
    frame: &FrameUniforms,
) -> RenderPass {
    // Unresolvable blocks cannot exist in a loaded chunk.
    let Some(shader) = block.shader() else {
        return pass;
    };
    let visual = block.visual();
    pass.stats.blocks += 1;

    if let Some(diffuse) = visual.diffuse {
        backend.bind_texture(TextureUnit::Diffuse, diffuse);
    }
    if let Some(specular) = visual.specular {
        backend.bind_texture(TextureUnit::Specular, specular);
    }

    if pass.current_shader != Some(shader) {
        backend.use_shader(shader);
        backend.set_uniform(shader, "view", UniformValue::Mat4(frame.view));
        backend.set_uniform(shader, "projection", UniformValue::Mat4(frame.projection));
        if visual.diffuse.is_some() {
            let viewer = frame.viewer_position;
            backend.set_uniform(
                shader,
                "viewPos",
                UniformValue::Vec3(Vector3::new(viewer.x, viewer.y, viewer.z)),
            );
            backend.set_uniform(shader, "material.diffuse", UniformValue::Int(DIFFUSE_UNIT));
        }
        if visual.specular.is_some() {
            backend.set_uniform(shader, "material.specular", UniformValue::Int(SPECULAR_UNIT));
            backend.set_uniform(
                shader,
                "material.shininess",
                UniformValue::Float(MATERIAL_SHININESS),
            );
        }
        pass.current_shader = Some(shader);
        pass.stats.shader_switches += 1;
    }

    if let Some(light) = block.light() {
        backend.set_uniform(shader, "fragColor", UniformValue::Vec3(light.diffuse));
    }

    let location = block.location();
    let model = Matrix4::from_translation(Vector3::new(
        location.x as f32,
        location.y as f32,
        location.z as f32,
    ));
    backend.set_uniform(shader, "model", UniformValue::Mat4(model));

    for side in block.faces().visible() {
        backend.draw_triangle_range(side.first_vertex(), VERTICES_PER_FACE);
        pass.stats.draws += 1;
    }
    pass
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::engine_state::{
        rendering::{
            recording::{RecordingBackend, RenderCall},
            AssetRegistry,
        },
        voxels::{
            block::block_type,
            capability::{Capability, CapabilityOwner, LightingCapability},
        },
    };
    use cgmath::{Point3, SquareMatrix, Vector2};

    fn frame() -> FrameUniforms {
        FrameUniforms {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            viewer_position: Point3::new(4.0, 2.0, 4.0),
        }
    }

    fn loaded(chunk: &mut Chunk, assets: &AssetRegistry) -> RecordingBackend {
        let mut backend = RecordingBackend::new();
        chunk.load(&mut backend, assets).unwrap();
        backend.clear_calls();
        backend
    }

    #[test]
    fn isolated_block_draws_all_six_ranges_in_face_order() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        chunk.place(Point3::new(3, 1, 3), block_type::CONTAINER, &assets).unwrap();
        let mut backend = loaded(&mut chunk, &assets);

        let stats = chunk.render(&mut backend, &frame());
        assert_eq!(
            backend.draws(),
            vec![(0, 6), (6, 6), (12, 6), (18, 6), (24, 6), (30, 6)]
        );
        assert_eq!(stats, RenderStats { blocks: 1, draws: 6, shader_switches: 1 });
        chunk.release(&mut backend);
    }

    #[test]
    fn adjacent_pair_skips_shared_x_faces() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        chunk.place(Point3::new(0, 0, 0), block_type::CONTAINER, &assets).unwrap();
        chunk.place(Point3::new(1, 0, 0), block_type::CONTAINER, &assets).unwrap();
        let mut backend = loaded(&mut chunk, &assets);

        chunk.render(&mut backend, &frame());
        assert_eq!(
            backend.draws(),
            vec![
                // (0,0,0): no +X
                (0, 6), (6, 6), (12, 6), (18, 6), (30, 6),
                // (1,0,0): no -X
                (0, 6), (6, 6), (12, 6), (18, 6), (24, 6),
            ]
        );
        chunk.release(&mut backend);
    }

    #[test]
    fn shared_uniforms_are_pushed_once_per_shader_run() {
        let assets = assets();
        let mut chunk = Chunk::new(Vector2::new(0, 0), &assets);
        let mut backend = loaded(&mut chunk, &assets);

        let stats = chunk.render(&mut backend, &frame());
        assert_eq!(stats.shader_switches, 1);
        assert_eq!(backend.count(|c| matches!(c, RenderCall::UseShader(_))), 1);
        assert_eq!(backend.uniforms_named("view").len(), 1);
        assert_eq!(backend.uniforms_named("material.shininess"), vec![(NORMAL_SHADER, UniformValue::Float(32.0))]);
        assert_eq!(backend.uniforms_named("model").len(), 512);
        assert_eq!(
            backend.count(|c| *c == RenderCall::BindTexture(TextureUnit::Diffuse, CONTAINER_DIFFUSE)),
            512
        );
        chunk.release(&mut backend);
    }

    #[test]
    fn current_shader_resets_every_frame() {
        let assets = assets();
        let mut chunk = Chunk::new(Vector2::new(0, 0), &assets);
        let mut backend = loaded(&mut chunk, &assets);

        chunk.render(&mut backend, &frame());
        chunk.render(&mut backend, &frame());
        assert_eq!(backend.count(|c| matches!(c, RenderCall::UseShader(_))), 2);
        chunk.release(&mut backend);
    }

    #[test]
    fn lamps_push_their_color_and_interleave_shaders() {
        let assets = assets();
        let mut chunk = Chunk::new(Vector2::new(0, 0), &assets);
        place_lamp(&mut chunk, Point3::new(5, 2, 5), Vector3::new(1.0, 0.0, 0.0), &assets);
        let mut backend = loaded(&mut chunk, &assets);

        let stats = chunk.render(&mut backend, &frame());
        assert_eq!(
            backend.uniforms_named("fragColor"),
            vec![(LAMP_SHADER, UniformValue::Vec3(Vector3::new(1.0, 0.0, 0.0)))]
        );
        // normal run, lamp, normal run again
        assert_eq!(stats.shader_switches, 3);
        // lamp has no textures, so no viewPos on its switch
        assert!(backend
            .uniforms_named("viewPos")
            .iter()
            .all(|(shader, _)| *shader == NORMAL_SHADER));
        chunk.release(&mut backend);
    }

    #[test]
    fn lit_block_on_a_non_emissive_shader_pushes_its_color() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        let cell = Point3::new(3, 1, 3);
        let color = Vector3::new(0.0, 1.0, 0.0);
        let mut block = BlockInstance::from_registry(cell, block_type::CONTAINER, &assets);
        block
            .attach(Capability::Lighting(LightingCapability::new(light_at(cell, color))))
            .unwrap();
        chunk.set(cell, block).unwrap();
        let mut backend = loaded(&mut chunk, &assets);
        assert_eq!(chunk.lights().len(), 1);

        chunk.render(&mut backend, &frame());
        assert_eq!(
            backend.uniforms_named("fragColor"),
            vec![(NORMAL_SHADER, UniformValue::Vec3(color))]
        );
        chunk.release(&mut backend);
    }

    #[test]
    fn unlit_blocks_push_no_color() {
        let assets = assets();
        let mut chunk = Chunk::new(Vector2::new(0, 0), &assets);
        let mut backend = loaded(&mut chunk, &assets);

        chunk.render(&mut backend, &frame());
        assert!(backend.uniforms_named("fragColor").is_empty());
        chunk.release(&mut backend);
    }

    #[test]
    fn model_is_the_block_translation() {
        let assets = assets();
        let mut chunk = empty_chunk(&assets);
        chunk.place(Point3::new(2, 1, 7), block_type::CONTAINER, &assets).unwrap();
        let mut backend = loaded(&mut chunk, &assets);

        chunk.render(&mut backend, &frame());
        assert_eq!(
            backend.uniforms_named("model"),
            vec![(
                NORMAL_SHADER,
                UniformValue::Mat4(Matrix4::from_translation(Vector3::new(2.0, 1.0, 7.0)))
            )]
        );
        chunk.release(&mut backend);
    }

    #[test]
    fn unloaded_chunk_renders_nothing() {
        let assets = assets();
        let chunk = Chunk::new(Vector2::new(0, 0), &assets);
        let mut backend = RecordingBackend::new();
        assert_eq!(chunk.render(&mut backend, &frame()), RenderStats::default());
        assert!(backend.calls.is_empty());
    }
}
