use crate::render::backend::{BufferTarget, GlBackend, Primitive};
use crate::render::layout::{LayoutError, VertexLayout};
use crate::render::resources::{Buffer, VertexArray};

/// Interleaved vertex floats plus optional indices. An empty `indices`
/// means the vertices are drawn in order.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

/// GPU-side copy of a `MeshData` with its layout recorded in a vertex array.
pub struct Mesh<'gl, B: GlBackend> {
    gl: &'gl B,
    vao: VertexArray<'gl, B>,
    _vertices: Buffer<'gl, B>,
    indices: Option<Buffer<'gl, B>>,
    primitive: Primitive,
    count: i32,
}

impl<'gl, B: GlBackend> Mesh<'gl, B> {
    pub fn upload(
        gl: &'gl B,
        data: &MeshData,
        layout: &VertexLayout,
        primitive: Primitive,
    ) -> Result<Self, LayoutError> {
        let vertex_count = layout.vertex_count(data.vertices.len() * std::mem::size_of::<f32>())?;

        let vao = VertexArray::new(gl);
        vao.bind();

        let vertices = Buffer::with_data(gl, BufferTarget::Vertex, &data.vertices);
        let indices = if data.indices.is_empty() {
            None
        } else {
            Some(Buffer::with_data(gl, BufferTarget::Index, &data.indices))
        };

        layout.apply(gl);

        vao.unbind();
        gl.bind_buffer(BufferTarget::Vertex, 0);

        let count = indices.as_ref().map_or(vertex_count, |buffer| buffer.len()) as i32;
        log::debug!(
            "Uploaded mesh: {} vertices, {} indices",
            vertex_count,
            data.indices.len()
        );

        Ok(Self {
            gl,
            vao,
            _vertices: vertices,
            indices,
            primitive,
            count,
        })
    }

    pub fn vao(&self) -> u32 {
        self.vao.id()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Vertices or indices issued per draw.
    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn draw(&self) {
        self.vao.bind();
        if self.is_indexed() {
            self.gl.draw_elements(self.primitive, self.count);
        } else {
            self.gl.draw_arrays(self.primitive, 0, self.count);
        }
    }
}
