//! Rendering collaborator interface for the voxel core.
//!
//! The core never talks to a graphics API directly. It issues calls against the
//! [`RenderBackend`] trait using opaque handles, and the backend maps them onto a
//! real device (see [`wgpu_backend`]) or records them (see [`recording`]).

use cgmath::{Matrix4, Point3, Vector3};

pub mod assets;
pub mod recording;
pub mod vertex;
pub mod wgpu_backend;

pub use assets::{AssetRegistry, ShaderProgram, VisualAssignment};
pub use vertex::CubeVertex;

/// Opaque handle to a compiled shader/material.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// Opaque handle to a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Opaque handle to a GPU buffer created by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Opaque handle to a vertex-array (attribute layout) object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayHandle(pub u32);

/// Texture units the block shaders sample from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureUnit {
    /// Unit 0, the diffuse map
    Diffuse = 0,
    /// Unit 1, the specular map
    Specular = 1,
}

/// Vertex attributes of the unit-cube geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeSemantic {
    /// `aPos`, three floats
    Position,
    /// `aNormal`, three floats
    Normal,
    /// `aTexCoords`, two floats
    TexCoord,
}

impl AttributeSemantic {
    /// Number of `f32` components.
    pub fn components(self) -> u32 {
        match self {
            AttributeSemantic::Position | AttributeSemantic::Normal => 3,
            AttributeSemantic::TexCoord => 2,
        }
    }
}

/// Value of a named shader uniform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    /// `int`
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec3`
    Vec3(Vector3<f32>),
    /// `mat4`
    Mat4(Matrix4<f32>),
}

/// Uniforms shared by every block in a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    /// World to view transform
    pub view: Matrix4<f32>,
    /// View to clip transform
    pub projection: Matrix4<f32>,
    /// Viewer position, pushed as `viewPos`
    pub viewer_position: Point3<f32>,
}

/// Operations the voxel core needs from the graphics layer.
///
/// Handles returned by the backend are owned by the caller, which must hand them
/// back through the matching `release_*` method exactly once.
pub trait RenderBackend {
    /// Creates an empty vertex buffer for shared geometry.
    fn create_geometry_buffer(&mut self) -> BufferHandle;

    /// Creates the vertex-array object the chunk's attribute layouts are recorded in.
    fn create_vertex_array(&mut self) -> VertexArrayHandle;

    /// Binds one vertex attribute of `shader` to the current geometry buffer.
    ///
    /// # Arguments
    /// * `shader` - The shader whose attribute location is being bound
    /// * `attribute` - Which attribute to bind
    /// * `offset` - Byte offset of the attribute inside a vertex
    /// * `stride` - Byte size of a whole vertex
    fn bind_vertex_layout(
        &mut self,
        shader: ShaderHandle,
        attribute: AttributeSemantic,
        offset: u64,
        stride: u64,
    );

    /// Creates an empty structured (storage) buffer visible to shaders at `binding`.
    fn create_structured_buffer(&mut self, binding: u32) -> BufferHandle;

    /// Replaces the contents of `buffer` with `bytes`.
    fn upload_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]);

    /// Makes `shader` the active program.
    fn use_shader(&mut self, shader: ShaderHandle);

    /// Sets a named uniform on `shader`.
    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue);

    /// Binds `texture` to `unit`.
    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle);

    /// Draws `count` vertices of the bound geometry as triangles, starting at `start`.
    fn draw_triangle_range(&mut self, start: u32, count: u32);

    /// Releases a buffer created by this backend.
    fn release_buffer(&mut self, buffer: BufferHandle);

    /// Releases a vertex-array object created by this backend.
    fn release_vertex_array(&mut self, vertex_array: VertexArrayHandle);
}
