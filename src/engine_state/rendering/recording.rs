//! In-memory rendering backend.
//!
//! [`RecordingBackend`] hands out sequential handles and records every call it
//! receives. It backs the headless demo when no GPU adapter is available and is
//! the collaborator double used throughout the chunk tests.

use std::collections::HashMap;

use super::{
    AttributeSemantic, BufferHandle, RenderBackend, ShaderHandle, TextureHandle, TextureUnit,
    UniformValue, VertexArrayHandle,
};

/// One call received by a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    /// `create_geometry_buffer`
    CreateGeometryBuffer(BufferHandle),
    /// `create_vertex_array`
    CreateVertexArray(VertexArrayHandle),
    /// `bind_vertex_layout`
    BindVertexLayout {
        /// Shader the attribute belongs to
        shader: ShaderHandle,
        /// Attribute bound
        attribute: AttributeSemantic,
        /// Byte offset within a vertex
        offset: u64,
        /// Vertex stride in bytes
        stride: u64,
    },
    /// `create_structured_buffer`
    CreateStructuredBuffer {
        /// Handle returned
        buffer: BufferHandle,
        /// Shader binding slot
        binding: u32,
    },
    /// `upload_buffer`, with the byte count uploaded
    UploadBuffer {
        /// Target buffer
        buffer: BufferHandle,
        /// Number of bytes uploaded
        len: usize,
    },
    /// `use_shader`
    UseShader(ShaderHandle),
    /// `set_uniform`
    SetUniform {
        /// Shader the uniform was set on
        shader: ShaderHandle,
        /// Uniform name
        name: String,
        /// Uniform value
        value: UniformValue,
    },
    /// `bind_texture`
    BindTexture(TextureUnit, TextureHandle),
    /// `draw_triangle_range`
    Draw {
        /// First vertex
        start: u32,
        /// Vertex count
        count: u32,
    },
    /// `release_buffer`
    ReleaseBuffer(BufferHandle),
    /// `release_vertex_array`
    ReleaseVertexArray(VertexArrayHandle),
}

/// Backend that records calls instead of talking to a device.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Every call received, in order
    pub calls: Vec<RenderCall>,
    /// Last bytes uploaded to each live buffer
    pub buffers: HashMap<BufferHandle, Vec<u8>>,
    /// Vertex arrays not yet released
    pub vertex_arrays: Vec<VertexArrayHandle>,
    next_handle: u32,
}

impl RecordingBackend {
    /// Creates a backend with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Forgets the recorded calls, keeping live resources.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The `(start, count)` of every recorded draw.
    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Draw { start, count } => Some((*start, *count)),
                _ => None,
            })
            .collect()
    }

    /// Every value set for the uniform `name`, in call order.
    pub fn uniforms_named(&self, name: &str) -> Vec<(ShaderHandle, UniformValue)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::SetUniform {
                    shader,
                    name: n,
                    value,
                } if n == name => Some((*shader, *value)),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Buffers that were created and not released.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }
}

impl RenderBackend for RecordingBackend {
    fn create_geometry_buffer(&mut self) -> BufferHandle {
        let buffer = BufferHandle(self.next());
        self.buffers.insert(buffer, Vec::new());
        self.calls.push(RenderCall::CreateGeometryBuffer(buffer));
        buffer
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        let vertex_array = VertexArrayHandle(self.next());
        self.vertex_arrays.push(vertex_array);
        self.calls.push(RenderCall::CreateVertexArray(vertex_array));
        vertex_array
    }

    fn bind_vertex_layout(
        &mut self,
        shader: ShaderHandle,
        attribute: AttributeSemantic,
        offset: u64,
        stride: u64,
    ) {
        self.calls.push(RenderCall::BindVertexLayout {
            shader,
            attribute,
            offset,
            stride,
        });
    }

    fn create_structured_buffer(&mut self, binding: u32) -> BufferHandle {
        let buffer = BufferHandle(self.next());
        self.buffers.insert(buffer, Vec::new());
        self.calls
            .push(RenderCall::CreateStructuredBuffer { buffer, binding });
        buffer
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]) {
        self.buffers.insert(buffer, bytes.to_vec());
        self.calls.push(RenderCall::UploadBuffer {
            buffer,
            len: bytes.len(),
        });
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.calls.push(RenderCall::UseShader(shader));
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) {
        self.calls.push(RenderCall::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle) {
        self.calls.push(RenderCall::BindTexture(unit, texture));
    }

    fn draw_triangle_range(&mut self, start: u32, count: u32) {
        self.calls.push(RenderCall::Draw { start, count });
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
        self.calls.push(RenderCall::ReleaseBuffer(buffer));
    }

    fn release_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.retain(|live| *live != vertex_array);
        self.calls.push(RenderCall::ReleaseVertexArray(vertex_array));
    }
}
