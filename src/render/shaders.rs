// shaders.rs - shader compilation and program linking

use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::backend::{GlBackend, INFO_LOG_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    CompileFailed { stage: ShaderStage, log: String },
    #[error("Program linking failed: {log}")]
    LinkFailed { log: String },
    #[error("Failed to read shader {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

impl ShaderError {
    /// Banner the diagnostic is printed under, e.g.
    /// `ERROR::SHADER::VERTEX::COMPILATION_FAILED`.
    pub fn banner(&self) -> &'static str {
        match self {
            ShaderError::CompileFailed {
                stage: ShaderStage::Vertex,
                ..
            } => "ERROR::SHADER::VERTEX::COMPILATION_FAILED",
            ShaderError::CompileFailed {
                stage: ShaderStage::Fragment,
                ..
            } => "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED",
            ShaderError::LinkFailed { .. } => "ERROR::SHADER::PROGRAM::LINKING_FAILED",
            ShaderError::Io { .. } | ShaderError::Nul(_) => "ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ",
        }
    }
}

/// Source text of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource(String);

impl ShaderSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map(Self)
            .map_err(|source| ShaderError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShaderSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

/// A successfully compiled shader object. Deleted on drop.
pub struct CompiledStage<'gl, B: GlBackend> {
    gl: &'gl B,
    id: u32,
}

impl<'gl, B: GlBackend> CompiledStage<'gl, B> {
    /// Compiles `source` as `stage`. On failure the shader object is
    /// released and its info log returned in the error.
    pub fn compile(gl: &'gl B, stage: ShaderStage, source: &ShaderSource) -> Result<Self, ShaderError> {
        let id = gl.create_shader(stage);
        gl.shader_source(id, source.as_str());
        gl.compile_shader(id);

        if !gl.compile_status(id) {
            let log = gl.shader_info_log(id, INFO_LOG_CAPACITY);
            gl.delete_shader(id);
            return Err(ShaderError::CompileFailed { stage, log });
        }

        log::debug!("Compiled {} shader {}", stage, id);
        Ok(Self { gl, id })
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl<B: GlBackend> Drop for CompiledStage<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked vertex + fragment program. Deleted on drop.
pub struct ShaderProgram<'gl, B: GlBackend> {
    gl: &'gl B,
    id: u32,
    uniforms: HashMap<String, i32>,
}

/// Compiles both stages and links them.
///
/// Link is only attempted when both stages compiled. The stage objects are
/// released before returning, whether linking succeeded or not.
pub fn compile_program<'gl, B: GlBackend>(
    gl: &'gl B,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
) -> Result<ShaderProgram<'gl, B>, ShaderError> {
    let vertex_stage = CompiledStage::compile(gl, ShaderStage::Vertex, vertex)?;
    let fragment_stage = CompiledStage::compile(gl, ShaderStage::Fragment, fragment)?;

    let program = gl.create_program();
    gl.attach_shader(program, vertex_stage.id());
    gl.attach_shader(program, fragment_stage.id());
    gl.link_program(program);

    // The program keeps its own copy of the linked code.
    drop(vertex_stage);
    drop(fragment_stage);

    if !gl.link_status(program) {
        let log = gl.program_info_log(program, INFO_LOG_CAPACITY);
        gl.delete_program(program);
        return Err(ShaderError::LinkFailed { log });
    }

    log::info!("Linked shader program {}", program);
    Ok(ShaderProgram {
        gl,
        id: program,
        uniforms: HashMap::new(),
    })
}

impl<'gl, B: GlBackend> ShaderProgram<'gl, B> {
    pub fn new(gl: &'gl B, vertex: &ShaderSource, fragment: &ShaderSource) -> Result<Self, ShaderError> {
        compile_program(gl, vertex, fragment)
    }

    pub fn from_files<P: AsRef<Path>>(
        gl: &'gl B,
        vertex_path: P,
        fragment_path: P,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::from_file(vertex_path)?;
        let fragment = ShaderSource::from_file(fragment_path)?;
        compile_program(gl, &vertex, &fragment)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(self.id);
    }

    pub fn get_uniform_location(&mut self, name: &str) -> Result<i32, ShaderError> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }

        let cname = CString::new(name)?;
        let location = self.gl.uniform_location(self.id, &cname);

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }

    pub fn set_uniform_i32(&mut self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.set_used();
        let location = self.get_uniform_location(name)?;
        if location != -1 {
            self.gl.uniform_1i(location, value);
        }
        Ok(())
    }
}

impl<B: GlBackend> Drop for ShaderProgram<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

/// What to do when a program fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderPolicy {
    /// Return the error to the caller.
    Strict,
    /// Log the diagnostic and carry on without a program; draws then run
    /// with program 0 and produce undefined output.
    Permissive,
}

impl ShaderPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ShaderPolicy::Strict
        } else {
            ShaderPolicy::Permissive
        }
    }

    pub fn resolve<'gl, B: GlBackend>(
        self,
        result: Result<ShaderProgram<'gl, B>, ShaderError>,
    ) -> Result<Option<ShaderProgram<'gl, B>>, ShaderError> {
        match (result, self) {
            (Ok(program), _) => Ok(Some(program)),
            (Err(e), ShaderPolicy::Strict) => Err(e),
            (Err(e), ShaderPolicy::Permissive) => {
                log::error!("{}\n{}", e.banner(), e);
                Ok(None)
            }
        }
    }
}
