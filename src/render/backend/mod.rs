//! The GL entry points the renderer relies on.
//!
//! Everything above this module talks to `GlBackend` instead of calling `gl::*`
//! directly. `NativeGl` is the real implementation; the test-only `MockGl`
//! emulates just enough of the driver (compile/link status, attribute fetch,
//! draw recording) to check the renderer without a GPU.

mod native;

#[cfg(test)]
pub(crate) mod mock;

pub use native::NativeGl;

use std::ffi::CStr;

use crate::render::layout::VertexAttribute;
use crate::render::shaders::ShaderStage;
use crate::render::texture::{PixelFormat, SamplerSettings};

/// Capacity of the buffers used to read shader and program info logs.
pub const INFO_LOG_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`
    Vertex,
    /// `GL_ELEMENT_ARRAY_BUFFER`
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

/// Raw access to a current GL context.
///
/// Object names are the bare `GLuint`s the driver hands out; ownership of
/// them is tracked by the RAII wrappers in `render::resources`,
/// `render::shaders` and `render::texture`, never here.
pub trait GlBackend {
    fn create_shader(&self, stage: ShaderStage) -> u32;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn compile_status(&self, shader: u32) -> bool;
    /// Reads at most `capacity` bytes of the shader's info log.
    fn shader_info_log(&self, shader: u32, capacity: usize) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32, capacity: usize) -> String;
    fn delete_program(&self, program: u32);
    /// Program 0 unbinds.
    fn use_program(&self, program: u32);
    /// Returns -1 when the program has no active uniform with that name.
    fn uniform_location(&self, program: u32, name: &CStr) -> i32;
    fn uniform_1i(&self, location: i32, value: i32);

    fn gen_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vao: u32);
    fn delete_vertex_array(&self, vao: u32);

    fn gen_buffer(&self) -> u32;
    fn bind_buffer(&self, target: BufferTarget, buffer: u32);
    /// Uploads `data` with static-draw usage to the buffer bound at `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: u32);

    /// Describes `attribute` against the currently bound vertex buffer and
    /// records it in the currently bound vertex array.
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute);
    fn enable_vertex_attrib_array(&self, location: u32);

    fn gen_texture(&self) -> u32;
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture(&self, texture: u32);
    fn texture_parameters(&self, sampler: &SamplerSettings);
    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]);
    fn generate_mipmap(&self);
    fn delete_texture(&self, texture: u32);

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32);
    /// Draws `count` `u32` indices from the element buffer of the bound vertex array.
    fn draw_elements(&self, mode: Primitive, count: i32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, color: [f32; 4]);
    fn clear(&self);
}
