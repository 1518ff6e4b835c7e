use crate::render::backend::{BufferTarget, GlBackend};

/// A vertex array object. Deleted on drop.
pub struct VertexArray<'gl, B: GlBackend> {
    gl: &'gl B,
    id: u32,
}

impl<'gl, B: GlBackend> VertexArray<'gl, B> {
    pub fn new(gl: &'gl B) -> Self {
        let id = gl.gen_vertex_array();
        Self { gl, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.id);
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(0);
    }
}

impl<B: GlBackend> Drop for VertexArray<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.id);
    }
}

/// A buffer object holding vertex or index data, uploaded once.
pub struct Buffer<'gl, B: GlBackend> {
    gl: &'gl B,
    id: u32,
    len: usize,
}

impl<'gl, B: GlBackend> Buffer<'gl, B> {
    /// Creates the buffer, binds it at `target` and uploads `data`.
    ///
    /// Index buffers bind into the current vertex array, so one must be bound
    /// before calling this with `BufferTarget::Index`.
    pub fn with_data<T: bytemuck::Pod>(gl: &'gl B, target: BufferTarget, data: &[T]) -> Self {
        let id = gl.gen_buffer();
        gl.bind_buffer(target, id);
        gl.buffer_data(target, bytemuck::cast_slice(data));

        Self {
            gl,
            id,
            len: data.len(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of elements uploaded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<B: GlBackend> Drop for Buffer<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.id);
    }
}
