//! # WGPU Backend
//!
//! A [`RenderBackend`] over a real `wgpu` device.
//!
//! ## Responsibilities
//!
//! * Buffers are created and uploaded on the device immediately, with per-buffer
//!   memory analytics
//! * Vertex layouts bound per shader are kept as `wgpu::VertexAttribute` lists,
//!   grouped by vertex array
//! * Storage buffers are never allocated empty: an upload with no lights still
//!   reserves one packed light
//! * Per-frame state changes and draws are queued as [`GpuCommand`]s that the
//!   windowing layer replays inside its render pass
//!
//! Surface, pipeline and render-pass ownership stay with the windowing layer.

use std::collections::HashMap;

use log::{debug, info, warn};
use thiserror::Error;
use wgpu::{util::DeviceExt, Buffer, BufferUsages, Device, Queue};

use crate::engine_state::lighting::PackedPointLight;

use super::{
    vertex::CubeVertex, AttributeSemantic, BufferHandle, RenderBackend, ShaderHandle,
    TextureHandle, TextureUnit, UniformValue, VertexArrayHandle,
};

/// Failure to obtain a device for the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No adapter matched the request
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to create a device
    #[error("GPU device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Analytics data for a GPU buffer
///
/// Tracks memory allocation, usage, and write operations for a buffer
/// to help identify optimization opportunities.
#[derive(Debug, Default)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Actual memory used in the buffer in bytes (based on writes)
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// A buffer whose handle exists but whose device allocation waits for its first upload.
#[derive(Debug)]
struct PendingBuffer {
    label: &'static str,
    usage: BufferUsages,
    /// Smallest allocation the buffer may have, even for an empty upload
    min_size: u64,
}

/// A per-frame command for the render pass.
#[derive(Clone, Debug, PartialEq)]
pub enum GpuCommand {
    /// Switch pipeline to the one built for this shader
    UseShader(ShaderHandle),
    /// Write a named uniform of a shader
    SetUniform {
        /// Target shader
        shader: ShaderHandle,
        /// Uniform name
        name: String,
        /// Value written
        value: UniformValue,
    },
    /// Bind a texture to a sampling unit
    BindTexture(TextureUnit, TextureHandle),
    /// Draw a vertex range of the bound geometry
    Draw {
        /// First vertex
        start: u32,
        /// Vertex count
        count: u32,
    },
}

/// Vertex attributes bound per shader, grouped by vertex array.
///
/// Only the current vertex array accepts new bindings, mirroring how a GL
/// vertex-array object captures attribute pointers while it is bound.
#[derive(Debug, Default)]
struct VertexLayoutTable {
    layouts: HashMap<VertexArrayHandle, HashMap<ShaderHandle, Vec<wgpu::VertexAttribute>>>,
    current: Option<VertexArrayHandle>,
}

impl VertexLayoutTable {
    /// Registers `vertex_array` and makes it current.
    fn create(&mut self, vertex_array: VertexArrayHandle) {
        self.layouts.insert(vertex_array, HashMap::new());
        self.current = Some(vertex_array);
    }

    /// Appends `attribute` to `shader`'s layout in the current vertex array.
    ///
    /// # Returns
    /// `false` if no vertex array is current
    fn bind(&mut self, shader: ShaderHandle, attribute: AttributeSemantic, offset: u64) -> bool {
        let Some(layouts) = self
            .current
            .and_then(|vertex_array| self.layouts.get_mut(&vertex_array))
        else {
            return false;
        };
        layouts.entry(shader).or_default().push(wgpu::VertexAttribute {
            format: vertex_format(attribute),
            offset,
            shader_location: shader_location(attribute),
        });
        true
    }

    fn release(&mut self, vertex_array: VertexArrayHandle) {
        self.layouts.remove(&vertex_array);
        if self.current == Some(vertex_array) {
            self.current = None;
        }
    }

    /// Number of (vertex array, shader) layouts currently bound.
    fn len(&self) -> usize {
        self.layouts.values().map(HashMap::len).sum()
    }

    #[cfg(test)]
    fn attributes(
        &self,
        vertex_array: VertexArrayHandle,
        shader: ShaderHandle,
    ) -> Option<&[wgpu::VertexAttribute]> {
        self.layouts
            .get(&vertex_array)?
            .get(&shader)
            .map(Vec::as_slice)
    }
}

/// Shader input slot of a cube vertex attribute.
fn shader_location(attribute: AttributeSemantic) -> wgpu::ShaderLocation {
    match attribute {
        AttributeSemantic::Position => 0,
        AttributeSemantic::Normal => 1,
        AttributeSemantic::TexCoord => 2,
    }
}

fn vertex_format(attribute: AttributeSemantic) -> wgpu::VertexFormat {
    match attribute.components() {
        2 => wgpu::VertexFormat::Float32x2,
        _ => wgpu::VertexFormat::Float32x3,
    }
}

/// Bytes to allocate for an upload of `data_size` bytes into a buffer that may
/// never be smaller than `min_size`.
fn allocation_size(data_size: u64, min_size: u64) -> u64 {
    data_size.max(min_size)
}

/// [`RenderBackend`] backed by a `wgpu` device and queue.
pub struct WgpuBackend {
    device: Device,
    queue: Queue,
    buffers: HashMap<BufferHandle, Buffer>,
    pending: HashMap<BufferHandle, PendingBuffer>,
    buffer_analytics: HashMap<BufferHandle, BufferAnalytics>,
    vertex_layouts: VertexLayoutTable,
    frame: Vec<GpuCommand>,
    next_handle: u32,
}

impl WgpuBackend {
    /// Wraps an existing device and queue.
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            pending: HashMap::new(),
            buffer_analytics: HashMap::new(),
            vertex_layouts: VertexLayoutTable::default(),
            frame: Vec::new(),
            next_handle: 0,
        }
    }

    /// Requests an adapter and device without a surface.
    ///
    /// # Returns
    /// A backend on the first primary adapter, or the reason none could be created
    pub fn request_headless() -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        pollster::block_on(async move {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await?;

            info!("Using adapter {:?}", adapter.get_info().name);

            let (device, queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: Some("voxel chunk device"),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                    trace: wgpu::Trace::Off,
                })
                .await?;

            Ok(Self::new(device, queue))
        })
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Drains the commands queued since the last call.
    pub fn take_frame_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.frame)
    }

    /// Number of per-shader vertex layouts bound and not yet released.
    pub fn bound_layout_count(&self) -> usize {
        self.vertex_layouts.len()
    }

    /// Gets the total allocated memory across all buffers
    ///
    /// # Returns
    ///
    /// Total allocated memory in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, analytics| acc + analytics.allocated_memory)
    }

    /// Gets the total used memory across all buffers
    ///
    /// # Returns
    ///
    /// Total used memory in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, analytics| acc + analytics.used_memory)
    }
}

impl RenderBackend for WgpuBackend {
    fn create_geometry_buffer(&mut self) -> BufferHandle {
        let buffer = BufferHandle(self.next());
        self.pending.insert(
            buffer,
            PendingBuffer {
                label: "unit cube geometry",
                usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                min_size: 0,
            },
        );
        buffer
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        let vertex_array = VertexArrayHandle(self.next());
        self.vertex_layouts.create(vertex_array);
        vertex_array
    }

    fn bind_vertex_layout(
        &mut self,
        shader: ShaderHandle,
        attribute: AttributeSemantic,
        offset: u64,
        stride: u64,
    ) {
        if stride != CubeVertex::STRIDE {
            warn!("Vertex layout for {:?} uses stride {}, expected {}", shader, stride, CubeVertex::STRIDE);
        }
        if !self.vertex_layouts.bind(shader, attribute, offset) {
            warn!("Vertex layout for {:?} bound with no vertex array", shader);
        }
    }

    fn create_structured_buffer(&mut self, binding: u32) -> BufferHandle {
        let buffer = BufferHandle(self.next());
        self.pending.insert(
            buffer,
            PendingBuffer {
                label: "point light storage",
                usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
                min_size: PackedPointLight::STRIDE as u64,
            },
        );
        debug!("Storage buffer {:?} at binding {}", buffer, binding);
        buffer
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]) {
        let data_size = bytes.len() as u64;

        if let Some(existing) = self.buffers.get(&buffer) {
            if existing.size() >= data_size {
                self.queue.write_buffer(existing, 0, bytes);
                let analytics = self.buffer_analytics.entry(buffer).or_default();
                analytics.used_memory = analytics.used_memory.max(data_size);
                analytics.times_written += 1;
                return;
            }
        }

        let (label, usage, min_size) = match self.pending.remove(&buffer) {
            Some(pending) => (pending.label, pending.usage, pending.min_size),
            None => match self.buffers.remove(&buffer) {
                Some(previous) => {
                    let usage = previous.usage();
                    previous.destroy();
                    ("resized buffer", usage, 0)
                }
                None => {
                    warn!("Upload to unknown buffer {:?} ignored", buffer);
                    return;
                }
            },
        };

        let size = allocation_size(data_size, min_size);
        let created = if size > data_size {
            let created = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            });
            if !bytes.is_empty() {
                self.queue.write_buffer(&created, 0, bytes);
            }
            created
        } else {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytes,
                    usage,
                })
        };
        debug!("Created {} ({} bytes for {} of data) as {:?}", label, size, data_size, buffer);

        self.buffers.insert(buffer, created);
        let analytics = self.buffer_analytics.entry(buffer).or_default();
        analytics.allocated_memory = size;
        analytics.used_memory = data_size;
        analytics.times_written += 1;
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.frame.push(GpuCommand::UseShader(shader));
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) {
        self.frame.push(GpuCommand::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle) {
        self.frame.push(GpuCommand::BindTexture(unit, texture));
    }

    fn draw_triangle_range(&mut self, start: u32, count: u32) {
        self.frame.push(GpuCommand::Draw { start, count });
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.pending.remove(&buffer);
        self.buffer_analytics.remove(&buffer);
        if let Some(released) = self.buffers.remove(&buffer) {
            released.destroy();
        }
    }

    fn release_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_layouts.release(vertex_array);
    }
}
