//! Streaming vertex/index buffers with a grow-only capacity policy

use crate::{GlBuffer, InitError, InitResult};
use glow::{Context, HasContext};

/// Initial byte capacity of the vertex buffer
pub const INITIAL_VERTEX_BUFFER_BYTES: usize = 10_000;
/// Initial byte capacity of the index buffer
pub const INITIAL_INDEX_BUFFER_BYTES: usize = 2_000;

/// Byte capacity of a GPU buffer.
///
/// Capacity only ever grows: when a frame needs more than is available, the new
/// capacity is `max(capacity * 1.5, required)` (truncated), so a series of
/// slightly larger frames does not reallocate every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity {
    bytes: usize,
}

impl BufferCapacity {
    pub const fn new(bytes: usize) -> Self {
        Self { bytes }
    }

    pub fn bytes(self) -> usize {
        self.bytes
    }

    /// Grow to fit `required` bytes.
    ///
    /// Returns the new capacity when a reallocation is needed, `None` when the
    /// current allocation already fits.
    pub fn grow_to(&mut self, required: usize) -> Option<usize> {
        if required <= self.bytes {
            return None;
        }
        let scaled = self.bytes.saturating_mul(3) / 2;
        self.bytes = scaled.max(required);
        Some(self.bytes)
    }
}

/// A GL buffer object plus the capacity it was last allocated with
pub struct StreamBuffer {
    target: u32,
    handle: Option<GlBuffer>,
    capacity: BufferCapacity,
}

impl StreamBuffer {
    /// Create a buffer object and allocate `initial_bytes` of storage for it.
    ///
    /// Storage is allocated through `ARRAY_BUFFER` so no vertex array needs to be
    /// bound yet; `target` is used for every later bind.
    pub fn new(gl: &Context, target: u32, initial_bytes: usize) -> InitResult<Self> {
        let handle = unsafe { gl.create_buffer() }.map_err(InitError::CreateBufferObject)?;
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(handle));
            gl.buffer_data_size(glow::ARRAY_BUFFER, initial_bytes as i32, glow::DYNAMIC_DRAW);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        Ok(Self {
            target,
            handle: Some(handle),
            capacity: BufferCapacity::new(initial_bytes),
        })
    }

    pub fn handle(&self) -> Option<GlBuffer> {
        self.handle
    }

    pub fn capacity(&self) -> BufferCapacity {
        self.capacity
    }

    /// Reallocate storage if `required` bytes no longer fit. The buffer must be bound.
    pub fn reserve(&mut self, gl: &Context, required: usize) {
        if let Some(new_size) = self.capacity.grow_to(required) {
            tracing::debug!(
                target: "oslv-imgui-glow",
                "growing buffer 0x{:x} to {} bytes (required {})",
                self.target,
                new_size,
                required
            );
            unsafe { gl.buffer_data_size(self.target, new_size as i32, glow::DYNAMIC_DRAW) };
        }
    }

    /// Bind, grow if needed, and upload `bytes` at offset zero
    pub fn upload(&mut self, gl: &Context, bytes: &[u8]) {
        unsafe { gl.bind_buffer(self.target, self.handle) };
        self.reserve(gl, bytes.len());
        unsafe { gl.buffer_sub_data_u8_slice(self.target, 0, bytes) };
    }

    pub fn destroy(&mut self, gl: &Context) {
        if let Some(handle) = self.handle.take() {
            unsafe { gl.delete_buffer(handle) };
        }
    }
}
