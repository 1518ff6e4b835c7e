//! Recording stand-in for a GL driver, used by the unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::ffi::CStr;

use super::{BufferTarget, GlBackend, Primitive};
use crate::render::layout::{AttribKind, VertexAttribute};
use crate::render::shaders::ShaderStage;
use crate::render::texture::{PixelFormat, SamplerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Shader,
    Program,
    VertexArray,
    Buffer,
    Texture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    Arrays { first: i32, count: i32 },
    Elements { count: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: u32,
    pub vao: u32,
    pub texture: u32,
    pub mode: Primitive,
    pub kind: DrawKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttribBinding {
    pub attribute: VertexAttribute,
    pub buffer: u32,
    pub enabled: bool,
}

#[derive(Debug, Default)]
struct MockShader {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct MockVertexArray {
    pub attributes: BTreeMap<u32, AttribBinding>,
    pub element_buffer: Option<u32>,
}

#[derive(Debug, Default, Clone)]
pub struct MockTexture {
    pub width: u32,
    pub height: u32,
    pub format: Option<PixelFormat>,
    pub pixels: Vec<u8>,
    pub sampler: Option<SamplerSettings>,
    pub mipmapped: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    vertex_arrays: HashMap<u32, MockVertexArray>,
    buffers: HashMap<u32, Vec<u8>>,
    textures: HashMap<u32, MockTexture>,
    current_program: u32,
    bound_vao: u32,
    bound_array_buffer: u32,
    bound_texture: u32,
    active_unit: u32,
    link_calls: usize,
    uniforms_set: Vec<(i32, i32)>,
    draws: Vec<DrawCall>,
    deleted: Vec<(ObjectKind, u32)>,
    clears: usize,
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Compiles anything that looks like a complete GLSL translation unit and
/// links any program whose vertex stage writes `gl_Position` and whose
/// fragment stage declares an output.
#[derive(Debug, Default)]
pub struct MockGl {
    state: RefCell<State>,
}

fn looks_compilable(source: &str) -> Result<(), String> {
    let trimmed = source.trim_start();
    if !trimmed.starts_with("#version") {
        return Err("0:1(1): error: #version directive is required".to_string());
    }
    if !trimmed.contains("void main") {
        return Err("0:1(1): error: entry point main() is not defined".to_string());
    }
    let opened = source.matches('{').count();
    let closed = source.matches('}').count();
    if opened != closed {
        return Err(format!(
            "0:{}(1): error: syntax error, unexpected end of file",
            source.lines().count()
        ));
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
        .collect()
}

fn bounded(mut log: String, capacity: usize) -> String {
    log.truncate(capacity);
    log
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn link_calls(&self) -> usize {
        self.state.borrow().link_calls
    }

    pub fn deleted(&self) -> Vec<(ObjectKind, u32)> {
        self.state.borrow().deleted.clone()
    }

    pub fn deletions_of(&self, kind: ObjectKind, id: u32) -> usize {
        self.state
            .borrow()
            .deleted
            .iter()
            .filter(|(k, i)| *k == kind && *i == id)
            .count()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> u32 {
        self.state.borrow().current_program
    }

    pub fn uniforms_set(&self) -> Vec<(i32, i32)> {
        self.state.borrow().uniforms_set.clone()
    }

    pub fn active_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn vertex_array(&self, vao: u32) -> Option<MockVertexArray> {
        self.state.borrow().vertex_arrays.get(&vao).cloned()
    }

    pub fn texture(&self, texture: u32) -> Option<MockTexture> {
        self.state.borrow().textures.get(&texture).cloned()
    }

    /// Reads one vertex's worth of an attribute the way the vertex puller
    /// would: through the buffer, stride and offset recorded in `vao`.
    pub fn fetch_attribute(&self, vao: u32, location: u32, vertex: usize) -> Option<Vec<f32>> {
        let state = self.state.borrow();
        let binding = state.vertex_arrays.get(&vao)?.attributes.get(&location)?;
        if !binding.enabled {
            return None;
        }
        let data = state.buffers.get(&binding.buffer)?;
        let attribute = &binding.attribute;
        let start = vertex * attribute.stride as usize + attribute.offset as usize;
        let size = attribute.kind.size();

        (0..attribute.components as usize)
            .map(|component| {
                let at = start + component * size;
                let bytes = data.get(at..at + size)?;
                Some(match attribute.kind {
                    AttribKind::Float => bytemuck::pod_read_unaligned::<f32>(bytes),
                    AttribKind::UnsignedByte if attribute.normalized => bytes[0] as f32 / 255.0,
                    AttribKind::UnsignedByte => bytes[0] as f32,
                    AttribKind::Int => bytemuck::pod_read_unaligned::<i32>(bytes) as f32,
                    AttribKind::UnsignedInt => bytemuck::pod_read_unaligned::<u32>(bytes) as f32,
                })
            })
            .collect()
    }

    pub fn element_indices(&self, vao: u32) -> Option<Vec<u32>> {
        let state = self.state.borrow();
        let buffer = state.vertex_arrays.get(&vao)?.element_buffer?;
        let data = state.buffers.get(&buffer)?;
        Some(
            data.chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
        )
    }
}

impl GlBackend for MockGl {
    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.shaders.insert(
            id,
            MockShader {
                stage: Some(stage),
                ..MockShader::default()
            },
        );
        id
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            entry.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            match looks_compilable(&entry.source) {
                Ok(()) => {
                    entry.compiled = true;
                    entry.log.clear();
                }
                Err(log) => {
                    entry.compiled = false;
                    entry.log = log;
                }
            }
        }
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |entry| entry.compiled)
    }

    fn shader_info_log(&self, shader: u32, capacity: usize) -> String {
        let log = self
            .state
            .borrow()
            .shaders
            .get(&shader)
            .map(|entry| entry.log.clone())
            .unwrap_or_default();
        bounded(log, capacity)
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.deleted.push((ObjectKind::Shader, shader));
    }

    fn create_program(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.programs.insert(id, MockProgram::default());
        id
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(entry) = self.state.borrow_mut().programs.get_mut(&program) {
            entry.attached.push(shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.link_calls += 1;

        let mut vertex = None;
        let mut fragment = None;
        let attached = state
            .programs
            .get(&program)
            .map(|entry| entry.attached.clone())
            .unwrap_or_default();
        for shader in attached {
            if let Some(entry) = state.shaders.get(&shader) {
                match entry.stage {
                    Some(ShaderStage::Vertex) if entry.compiled => vertex = Some(entry.source.clone()),
                    Some(ShaderStage::Fragment) if entry.compiled => {
                        fragment = Some(entry.source.clone())
                    }
                    _ => {}
                }
            }
        }

        let outcome = match (vertex, fragment) {
            (Some(vs), Some(_)) if !vs.contains("gl_Position") => {
                Err("error: vertex shader does not write gl_Position".to_string())
            }
            (Some(_), Some(fs)) if !fs.contains("out vec4") => {
                Err("error: fragment shader has no output".to_string())
            }
            (Some(vs), Some(fs)) => {
                let mut uniforms = declared_uniforms(&vs);
                uniforms.extend(declared_uniforms(&fs));
                Ok(uniforms)
            }
            _ => Err("error: program needs one compiled vertex and fragment shader".to_string()),
        };

        if let Some(entry) = state.programs.get_mut(&program) {
            match outcome {
                Ok(uniforms) => {
                    entry.linked = true;
                    entry.log.clear();
                    entry.uniforms = uniforms;
                }
                Err(log) => {
                    entry.linked = false;
                    entry.log = log;
                }
            }
        }
    }

    fn link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |entry| entry.linked)
    }

    fn program_info_log(&self, program: u32, capacity: usize) -> String {
        let log = self
            .state
            .borrow()
            .programs
            .get(&program)
            .map(|entry| entry.log.clone())
            .unwrap_or_default();
        bounded(log, capacity)
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.deleted.push((ObjectKind::Program, program));
    }

    fn use_program(&self, program: u32) {
        self.state.borrow_mut().current_program = program;
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> i32 {
        let name = name.to_string_lossy();
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|entry| entry.uniforms.iter().position(|uniform| *uniform == name))
            .map_or(-1, |index| index as i32)
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        self.state.borrow_mut().uniforms_set.push((location, value));
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.vertex_arrays.insert(id, MockVertexArray::default());
        id
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.state.borrow_mut().bound_vao = vao;
    }

    fn delete_vertex_array(&self, vao: u32) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vao);
        state.deleted.push((ObjectKind::VertexArray, vao));
    }

    fn gen_buffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.buffers.insert(id, Vec::new());
        id
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        let mut state = self.state.borrow_mut();
        match target {
            BufferTarget::Vertex => state.bound_array_buffer = buffer,
            BufferTarget::Index => {
                // Element buffer bindings are part of vertex-array state.
                let vao = state.bound_vao;
                if let Some(entry) = state.vertex_arrays.get_mut(&vao) {
                    entry.element_buffer = (buffer != 0).then_some(buffer);
                }
            }
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let buffer = match target {
            BufferTarget::Vertex => Some(state.bound_array_buffer),
            BufferTarget::Index => {
                let vao = state.bound_vao;
                state.vertex_arrays.get(&vao).and_then(|entry| entry.element_buffer)
            }
        };
        if let Some(contents) = buffer.and_then(|id| state.buffers.get_mut(&id)) {
            *contents = data.to_vec();
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.deleted.push((ObjectKind::Buffer, buffer));
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        let mut state = self.state.borrow_mut();
        let buffer = state.bound_array_buffer;
        let vao = state.bound_vao;
        if let Some(entry) = state.vertex_arrays.get_mut(&vao) {
            let enabled = entry
                .attributes
                .get(&attribute.location)
                .map_or(false, |binding| binding.enabled);
            entry.attributes.insert(
                attribute.location,
                AttribBinding {
                    attribute: attribute.clone(),
                    buffer,
                    enabled,
                },
            );
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        let mut state = self.state.borrow_mut();
        let vao = state.bound_vao;
        if let Some(binding) = state
            .vertex_arrays
            .get_mut(&vao)
            .and_then(|entry| entry.attributes.get_mut(&location))
        {
            binding.enabled = true;
        }
    }

    fn gen_texture(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.textures.insert(id, MockTexture::default());
        id
    }

    fn active_texture_unit(&self, unit: u32) {
        self.state.borrow_mut().active_unit = unit;
    }

    fn bind_texture(&self, texture: u32) {
        self.state.borrow_mut().bound_texture = texture;
    }

    fn texture_parameters(&self, sampler: &SamplerSettings) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_texture;
        if let Some(entry) = state.textures.get_mut(&bound) {
            entry.sampler = Some(sampler.clone());
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_texture;
        if let Some(entry) = state.textures.get_mut(&bound) {
            entry.width = width;
            entry.height = height;
            entry.format = Some(format);
            entry.pixels = pixels.to_vec();
        }
    }

    fn generate_mipmap(&self) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_texture;
        if let Some(entry) = state.textures.get_mut(&bound) {
            entry.mipmapped = true;
        }
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        state.deleted.push((ObjectKind::Texture, texture));
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        let call = DrawCall {
            program: state.current_program,
            vao: state.bound_vao,
            texture: state.bound_texture,
            mode,
            kind: DrawKind::Arrays { first, count },
        };
        state.draws.push(call);
    }

    fn draw_elements(&self, mode: Primitive, count: i32) {
        let mut state = self.state.borrow_mut();
        let call = DrawCall {
            program: state.current_program,
            vao: state.bound_vao,
            texture: state.bound_texture,
            mode,
            kind: DrawKind::Elements { count },
        };
        state.draws.push(call);
    }

    fn viewport(&self, _x: i32, _y: i32, _width: i32, _height: i32) {}

    fn clear_color(&self, _color: [f32; 4]) {}

    fn clear(&self) {
        self.state.borrow_mut().clears += 1;
    }
}
