use gl::types::*;
use std::ffi::{c_void, CStr};
use std::ptr;

use super::{BufferTarget, GlBackend, Primitive};
use crate::render::layout::{AttribKind, VertexAttribute};
use crate::render::shaders::ShaderStage;
use crate::render::texture::{PixelFormat, SamplerSettings, TextureFilter, TextureWrap};
use crate::window::ContextError;

/// `GlBackend` over the global function pointers of the `gl` crate.
///
/// Only obtainable through [`NativeGl::load_with`], so holding one means a
/// context was current when the pointers were resolved.
#[derive(Debug)]
pub struct NativeGl {
    _loaded: (),
}

impl NativeGl {
    pub fn load_with<F>(loader: F) -> Result<Self, ContextError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        if !gl::CreateShader::is_loaded() || !gl::GenVertexArrays::is_loaded() {
            return Err(ContextError::LoaderInitFailed);
        }

        log::info!("OpenGL function pointers loaded");
        Ok(Self { _loaded: () })
    }
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn target_enum(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Vertex => gl::ARRAY_BUFFER,
        BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn primitive_enum(mode: Primitive) -> GLenum {
    match mode {
        Primitive::Triangles => gl::TRIANGLES,
    }
}

fn kind_enum(kind: AttribKind) -> GLenum {
    match kind {
        AttribKind::Float => gl::FLOAT,
        AttribKind::UnsignedByte => gl::UNSIGNED_BYTE,
        AttribKind::Int => gl::INT,
        AttribKind::UnsignedInt => gl::UNSIGNED_INT,
    }
}

fn wrap_enum(wrap: TextureWrap) -> GLint {
    (match wrap {
        TextureWrap::Repeat => gl::REPEAT,
        TextureWrap::MirroredRepeat => gl::MIRRORED_REPEAT,
        TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    }) as GLint
}

fn filter_enum(filter: TextureFilter) -> GLint {
    (match filter {
        TextureFilter::Nearest => gl::NEAREST,
        TextureFilter::Linear => gl::LINEAR,
        TextureFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        TextureFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    }) as GLint
}

fn read_info_log(capacity: usize, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    let mut buffer = vec![0u8; capacity];
    let mut written: GLsizei = 0;
    read(capacity as GLsizei, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.clamp(0, capacity as GLsizei) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl GlBackend for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> u32 {
        unsafe { gl::CreateShader(stage_enum(stage)) }
    }

    fn shader_source(&self, shader: u32, source: &str) {
        // Explicit length, so the source needs no trailing NUL.
        let Ok(length) = GLint::try_from(source.len()) else {
            log::error!(
                "Shader {} source of {} bytes is too long to upload",
                shader,
                source.len()
            );
            return;
        };
        let pointer = source.as_ptr() as *const GLchar;
        unsafe {
            gl::ShaderSource(shader, 1, &pointer, &length);
        }
    }

    fn compile_shader(&self, shader: u32) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: u32) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: u32, capacity: usize) -> String {
        read_info_log(capacity, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buffer);
        })
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: u32) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: u32) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: u32, capacity: usize) -> String {
        read_info_log(capacity, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, len, written, buffer);
        })
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program) }
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> i32 {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut vao = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
        }
        vao
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: u32) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn gen_buffer(&self) -> u32 {
        let mut buffer = 0;
        unsafe {
            gl::GenBuffers(1, &mut buffer);
        }
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        unsafe { gl::BindBuffer(target_enum(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target_enum(target),
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        // VertexLayout::new rejects such strides; only hand-built layouts get here.
        let Ok(stride) = GLsizei::try_from(attribute.stride) else {
            log::error!(
                "Attribute {} stride {} is out of range",
                attribute.location,
                attribute.stride
            );
            return;
        };
        unsafe {
            gl::VertexAttribPointer(
                attribute.location,
                attribute.components as GLint,
                kind_enum(attribute.kind),
                if attribute.normalized { gl::TRUE } else { gl::FALSE },
                stride,
                attribute.offset as usize as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { gl::EnableVertexAttribArray(location) }
    }

    fn gen_texture(&self) -> u32 {
        let mut texture = 0;
        unsafe {
            gl::GenTextures(1, &mut texture);
        }
        texture
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: u32) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture) }
    }

    fn texture_parameters(&self, sampler: &SamplerSettings) {
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap_enum(sampler.wrap));
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap_enum(sampler.wrap));
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                filter_enum(sampler.min_filter),
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                filter_enum(sampler.mag_filter),
            );
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let format = match format {
            PixelFormat::Rgba => gl::RGBA,
        };
        let (Ok(gl_width), Ok(gl_height)) =
            (GLsizei::try_from(width), GLsizei::try_from(height))
        else {
            log::error!("Texture of {}x{} exceeds the GL size range", width, height);
            return;
        };
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                gl_width,
                gl_height,
                0,
                format,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void,
            );
        }
    }

    fn generate_mipmap(&self) {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) }
    }

    fn delete_texture(&self, texture: u32) {
        unsafe { gl::DeleteTextures(1, &texture) }
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        unsafe { gl::DrawArrays(primitive_enum(mode), first, count) }
    }

    fn draw_elements(&self, mode: Primitive, count: i32) {
        unsafe {
            gl::DrawElements(primitive_enum(mode), count, gl::UNSIGNED_INT, ptr::null());
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, color: [f32; 4]) {
        unsafe { gl::ClearColor(color[0], color[1], color[2], color[3]) }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }
}
